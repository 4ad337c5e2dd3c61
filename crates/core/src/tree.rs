//! Canonical cut-tree representation and the small geometry types it uses.
//!
//! The optimizer service describes its result as a binary tree of
//! guillotine cuts. Two wire encodings of that tree exist (see
//! [`crate::schema`]); both normalize into [`CutNode`], and everything
//! downstream (reconstruction, statistics, reporting) operates on this
//! one type only.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Axis of a guillotine cut.
///
/// Follows the shop convention of the cutting service: a `V` cut runs
/// across the block's length, `D` across its width, `H` across its
/// height. The mapping to coordinate dimensions is fixed, not
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CutAxis {
    /// Horizontal cut, offsets along z (height).
    H,
    /// Vertical cut, offsets along x (length).
    V,
    /// Depth cut, offsets along y (width).
    D,
}

impl CutAxis {
    /// Index of the coordinate dimension this axis offsets: `V→0 (x)`,
    /// `D→1 (y)`, `H→2 (z)`.
    pub fn dimension(self) -> usize {
        match self {
            CutAxis::V => 0,
            CutAxis::D => 1,
            CutAxis::H => 2,
        }
    }

    /// Parses a producer axis tag. Anything other than `"H"`, `"V"` or
    /// `"D"` (notably the producer's `"NONE"` leaf marker) yields `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "H" => Some(CutAxis::H),
            "V" => Some(CutAxis::V),
            "D" => Some(CutAxis::D),
            _ => None,
        }
    }
}

impl fmt::Display for CutAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            CutAxis::H => "H",
            CutAxis::V => "V",
            CutAxis::D => "D",
        };
        f.write_str(tag)
    }
}

/// Canonical item identifier.
///
/// Producer payloads carry item ids both as JSON numbers (typed catalog
/// entries) and as strings (JSON object keys in `item_counts`). All
/// aggregation maps key on the string form; this newtype is the single
/// place where the coercion happens. Serialization emits a number again
/// whenever the key parses as an integer, so request bodies stay
/// compatible with the service's integer ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(String);

impl ItemKey {
    /// Creates a key from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        ItemKey(id.into())
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Coerces a raw JSON value into a key. Numbers and strings are
    /// accepted; anything else (null included) is not an identifier.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(ItemKey(s.clone())),
            serde_json::Value::Number(n) => Some(ItemKey(coerce_number(n))),
            _ => None,
        }
    }
}

/// Renders a JSON number without a trailing `.0` so that `1` and `1.0`
/// coerce to the same key.
fn coerce_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(f) = n.as_f64() {
        if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            return (f as i64).to_string();
        }
        return f.to_string();
    }
    n.to_string()
}

impl From<&str> for ItemKey {
    fn from(s: &str) -> Self {
        ItemKey(s.to_string())
    }
}

impl From<String> for ItemKey {
    fn from(s: String) -> Self {
        ItemKey(s)
    }
}

impl From<i64> for ItemKey {
    fn from(n: i64) -> Self {
        ItemKey(n.to_string())
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ItemKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for ItemKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct KeyVisitor;

        impl serde::de::Visitor<'_> for KeyVisitor {
            type Value = ItemKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an item id (string or number)")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<ItemKey, E> {
                Ok(ItemKey(v.to_string()))
            }

            fn visit_string<E: serde::de::Error>(self, v: String) -> std::result::Result<ItemKey, E> {
                Ok(ItemKey(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> std::result::Result<ItemKey, E> {
                Ok(ItemKey(v.to_string()))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> std::result::Result<ItemKey, E> {
                Ok(ItemKey(v.to_string()))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> std::result::Result<ItemKey, E> {
                if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                    Ok(ItemKey((v as i64).to_string()))
                } else {
                    Ok(ItemKey(v.to_string()))
                }
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

/// A point in block coordinates. The stock block's origin is `(0,0,0)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// The block origin.
    pub const ORIGIN: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    /// Creates a point.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    /// Returns a copy shifted by `amount` along the given dimension
    /// (0 = x, 1 = y, 2 = z), leaving the other two coordinates unchanged.
    pub fn offset(self, dimension: usize, amount: f64) -> Self {
        let mut p = self;
        match dimension {
            0 => p.x += amount,
            1 => p.y += amount,
            _ => p.z += amount,
        }
        p
    }
}

/// Extents of a placed item (length × width × height).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dims3 {
    pub l: f64,
    pub w: f64,
    pub h: f64,
}

impl Dims3 {
    /// Creates a dimension triple.
    pub fn new(l: f64, w: f64, h: f64) -> Self {
        Dims3 { l, w, h }
    }

    /// Volume of the box.
    pub fn volume(&self) -> f64 {
        self.l * self.w * self.h
    }

    /// True when every extent is strictly positive. Anything else is a
    /// degenerate box that must not be rendered.
    pub fn is_renderable(&self) -> bool {
        self.l > 0.0 && self.w > 0.0 && self.h > 0.0
    }
}

/// Stock block extents, implicit origin `(0,0,0)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockDims {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl BlockDims {
    /// Creates block extents.
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        BlockDims {
            length,
            width,
            height,
        }
    }

    /// Total stock volume.
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }
}

/// Canonical cut-tree node.
///
/// Invariant (upheld by the producer, not re-verified here): for a `Cut`
/// node, `position + kerf` does not exceed the node's extent along
/// `axis`, so sibling sub-blocks never overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CutNode {
    /// A final item occupying its sub-block.
    Leaf {
        item_id: ItemKey,
        length: f64,
        width: f64,
        height: f64,
    },
    /// A guillotine cut splitting a sub-block into two children.
    Cut {
        axis: CutAxis,
        position: f64,
        kerf: f64,
        left: Box<CutNode>,
        right: Box<CutNode>,
    },
    /// An unrecognized or vacant producer node. Renders to nothing;
    /// callers must treat it as "nothing to render", never as a failure.
    Empty,
}

impl CutNode {
    /// True for the no-op marker.
    pub fn is_empty(&self) -> bool {
        matches!(self, CutNode::Empty)
    }

    /// Number of item leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            CutNode::Leaf { .. } => 1,
            CutNode::Cut { left, right, .. } => left.leaf_count() + right.leaf_count(),
            CutNode::Empty => 0,
        }
    }

    /// Number of cut nodes in the tree.
    pub fn cut_count(&self) -> usize {
        match self {
            CutNode::Cut { left, right, .. } => 1 + left.cut_count() + right.cut_count(),
            _ => 0,
        }
    }
}
