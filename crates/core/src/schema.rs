//! Normalization of the producer's tree encodings.
//!
//! The optimizer service has emitted its cut tree in two shapes over
//! time:
//!
//! - **current**: `item_id`/`length`/`width`/`height` on leaves,
//!   `cut_dir`/`cut_pos`/`left_pattern`/`right_pattern` on cuts
//! - **legacy**: `kind` (`"leaf"`/`"cut"`), `box` (extents), `axis`,
//!   `pos`, `children` (`[left, right]`), `item` for the leaf id
//!
//! Both normalize into [`CutNode`] here, once, at parse time. Downstream
//! code never branches on the wire shape again. A node matching neither
//! encoding becomes [`CutNode::Empty`] ("nothing to render", not a
//! failure) and missing numeric fields default to 0.

use crate::tree::{CutAxis, CutNode, ItemKey};
use serde_json::{Map, Value};

/// Converts a raw producer tree into the canonical form.
///
/// `kerf` is the technology kerf for this result; it is stamped onto
/// every `Cut` node so the canonical tree carries its own offsets and
/// reconstruction needs no extra context.
pub fn normalize_tree(raw: &Value, kerf: f64) -> CutNode {
    let Some(obj) = raw.as_object() else {
        return CutNode::Empty;
    };

    // Detection rule: any current-schema field selects the current
    // encoding; otherwise fall back to the legacy field names.
    let is_current = obj.contains_key("cut_dir")
        || obj.contains_key("length")
        || obj.contains_key("width")
        || obj.contains_key("height");

    if is_current {
        normalize_current(obj, kerf)
    } else {
        normalize_legacy(obj, kerf)
    }
}

fn num(obj: &Map<String, Value>, key: &str) -> f64 {
    obj.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn child(obj: &Map<String, Value>, key: &str, kerf: f64) -> CutNode {
    obj.get(key)
        .map(|v| normalize_tree(v, kerf))
        .unwrap_or(CutNode::Empty)
}

fn normalize_current(obj: &Map<String, Value>, kerf: f64) -> CutNode {
    let axis = obj
        .get("cut_dir")
        .and_then(Value::as_str)
        .and_then(CutAxis::parse);

    match axis {
        Some(axis) => CutNode::Cut {
            axis,
            position: num(obj, "cut_pos"),
            kerf,
            left: Box::new(child(obj, "left_pattern", kerf)),
            right: Box::new(child(obj, "right_pattern", kerf)),
        },
        // `cut_dir` of "NONE", null or absent: a leaf when an item id is
        // present, a vacant sub-block otherwise.
        None => match obj.get("item_id").and_then(ItemKey::from_value) {
            Some(item_id) => CutNode::Leaf {
                item_id,
                length: num(obj, "length"),
                width: num(obj, "width"),
                height: num(obj, "height"),
            },
            None => CutNode::Empty,
        },
    }
}

fn normalize_legacy(obj: &Map<String, Value>, kerf: f64) -> CutNode {
    let dims = obj.get("box").and_then(Value::as_object);
    let box_num = |key: &str| dims.map(|d| num(d, key)).unwrap_or(0.0);

    match obj.get("kind").and_then(Value::as_str) {
        Some("leaf") => match obj.get("item").and_then(ItemKey::from_value) {
            Some(item_id) => CutNode::Leaf {
                item_id,
                length: box_num("l"),
                width: box_num("w"),
                height: box_num("h"),
            },
            None => CutNode::Empty,
        },
        Some("cut") => {
            let axis = obj
                .get("axis")
                .and_then(Value::as_str)
                .and_then(CutAxis::parse);
            let Some(axis) = axis else {
                return CutNode::Empty;
            };
            let children = obj.get("children").and_then(Value::as_array);
            let side = |idx: usize| {
                children
                    .and_then(|c| c.get(idx))
                    .map(|v| normalize_tree(v, kerf))
                    .unwrap_or(CutNode::Empty)
            };
            CutNode::Cut {
                axis,
                position: num(obj, "pos"),
                kerf,
                left: Box::new(side(0)),
                right: Box::new(side(1)),
            }
        }
        _ => CutNode::Empty,
    }
}
