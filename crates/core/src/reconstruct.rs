//! 3D placement reconstruction from a canonical cut tree.
//!
//! Walks the tree depth-first, left child first, carrying the absolute
//! origin of the current sub-block. A leaf emits one placement at that
//! origin; a cut shifts the right child's origin by `position + kerf`
//! along the cut axis's dimension. The traversal is pure (origins are
//! passed by value, never mutated in place), so reconstructing the same
//! tree twice yields an identical placement sequence.
//!
//! No pairwise overlap checking happens here: absence of overlap is an
//! inherited invariant of a valid guillotine tree.

use crate::tree::{CutNode, Dims3, ItemKey, Point3};
use serde::Serialize;

/// A single item placed at an absolute position inside the stock block.
///
/// Request-scoped: produced per result and consumed immediately by the
/// render and report layers, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedItem {
    /// Canonical id of the catalog item occupying this box.
    pub item_id: ItemKey,
    /// Absolute position of the box's minimum corner.
    pub origin: Point3,
    /// Extents of the box.
    pub dimensions: Dims3,
}

impl PlacedItem {
    /// Volume occupied by this placement.
    pub fn volume(&self) -> f64 {
        self.dimensions.volume()
    }
}

/// Reconstructs absolute item placements from a canonical cut tree.
///
/// Placements are emitted in left-to-right, depth-first order matching
/// the tree structure. Leaves with a non-positive dimension are skipped
/// silently (logged at debug level); `Empty` nodes contribute nothing.
pub fn reconstruct(root: &CutNode) -> Vec<PlacedItem> {
    let mut placements = Vec::with_capacity(root.leaf_count());
    collect(root, Point3::ORIGIN, &mut placements);
    placements
}

fn collect(node: &CutNode, origin: Point3, out: &mut Vec<PlacedItem>) {
    match node {
        CutNode::Leaf {
            item_id,
            length,
            width,
            height,
        } => {
            let dimensions = Dims3::new(*length, *width, *height);
            if !dimensions.is_renderable() {
                log::debug!(
                    "skipping degenerate leaf for item {}: {}x{}x{}",
                    item_id,
                    length,
                    width,
                    height
                );
                return;
            }
            out.push(PlacedItem {
                item_id: item_id.clone(),
                origin,
                dimensions,
            });
        }
        CutNode::Cut {
            axis,
            position,
            kerf,
            left,
            right,
        } => {
            collect(left, origin, out);
            let right_origin = origin.offset(axis.dimension(), position + kerf);
            collect(right, right_origin, out);
        }
        CutNode::Empty => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::CutAxis;

    fn leaf(id: i64, l: f64, w: f64, h: f64) -> CutNode {
        CutNode::Leaf {
            item_id: ItemKey::from(id),
            length: l,
            width: w,
            height: h,
        }
    }

    fn cut(axis: CutAxis, position: f64, kerf: f64, left: CutNode, right: CutNode) -> CutNode {
        CutNode::Cut {
            axis,
            position,
            kerf,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn test_single_leaf_at_origin() {
        let placements = reconstruct(&leaf(1, 100.0, 50.0, 30.0));
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].origin, Point3::ORIGIN);
        assert_eq!(placements[0].dimensions, Dims3::new(100.0, 50.0, 30.0));
    }

    #[test]
    fn test_vertical_cut_offsets_x() {
        let tree = cut(
            CutAxis::V,
            100.0,
            2.0,
            leaf(1, 100.0, 50.0, 30.0),
            leaf(1, 98.0, 50.0, 30.0),
        );
        let placements = reconstruct(&tree);
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].origin, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(placements[1].origin, Point3::new(102.0, 0.0, 0.0));
    }

    #[test]
    fn test_depth_cut_offsets_y() {
        let tree = cut(
            CutAxis::D,
            40.0,
            4.0,
            leaf(2, 80.0, 40.0, 20.0),
            leaf(2, 80.0, 36.0, 20.0),
        );
        let placements = reconstruct(&tree);
        assert_eq!(placements[1].origin, Point3::new(0.0, 44.0, 0.0));
    }

    #[test]
    fn test_horizontal_cut_offsets_z() {
        let tree = cut(
            CutAxis::H,
            30.0,
            4.0,
            leaf(2, 60.0, 60.0, 30.0),
            leaf(2, 60.0, 60.0, 26.0),
        );
        let placements = reconstruct(&tree);
        assert_eq!(placements[1].origin, Point3::new(0.0, 0.0, 34.0));
    }

    #[test]
    fn test_nested_cuts_accumulate_offsets() {
        // Right subtree of a V cut containing a D cut: both offsets apply.
        let inner = cut(
            CutAxis::D,
            50.0,
            2.0,
            leaf(3, 90.0, 50.0, 60.0),
            leaf(3, 90.0, 48.0, 60.0),
        );
        let tree = cut(CutAxis::V, 100.0, 2.0, leaf(3, 100.0, 100.0, 60.0), inner);
        let placements = reconstruct(&tree);
        assert_eq!(placements.len(), 3);
        assert_eq!(placements[1].origin, Point3::new(102.0, 0.0, 0.0));
        assert_eq!(placements[2].origin, Point3::new(102.0, 52.0, 0.0));
    }

    #[test]
    fn test_left_to_right_depth_first_order() {
        let tree = cut(
            CutAxis::V,
            10.0,
            0.0,
            cut(
                CutAxis::D,
                5.0,
                0.0,
                leaf(1, 10.0, 5.0, 5.0),
                leaf(2, 10.0, 5.0, 5.0),
            ),
            leaf(3, 10.0, 10.0, 5.0),
        );
        let ids: Vec<String> = reconstruct(&tree)
            .iter()
            .map(|p| p.item_id.to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_idempotent() {
        let tree = cut(
            CutAxis::V,
            100.0,
            2.0,
            leaf(1, 100.0, 50.0, 30.0),
            cut(
                CutAxis::H,
                15.0,
                2.0,
                leaf(2, 98.0, 50.0, 15.0),
                leaf(2, 98.0, 50.0, 13.0),
            ),
        );
        assert_eq!(reconstruct(&tree), reconstruct(&tree));
    }

    #[test]
    fn test_degenerate_leaf_is_dropped() {
        let tree = cut(
            CutAxis::V,
            50.0,
            2.0,
            leaf(1, 0.0, 50.0, 30.0),
            leaf(1, -5.0, 50.0, 30.0),
        );
        assert!(reconstruct(&tree).is_empty());
    }

    #[test]
    fn test_empty_node_renders_nothing() {
        assert!(reconstruct(&CutNode::Empty).is_empty());
        let tree = cut(CutAxis::V, 10.0, 1.0, CutNode::Empty, leaf(4, 5.0, 5.0, 5.0));
        let placements = reconstruct(&tree);
        assert_eq!(placements.len(), 1);
        // Right side still shifted even though left is vacant.
        assert_eq!(placements[0].origin, Point3::new(11.0, 0.0, 0.0));
    }
}
