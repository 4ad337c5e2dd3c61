//! Fill and waste statistics.
//!
//! Two input modes, selected by what the producer supplied:
//!
//! 1. **Authoritative**: the response carried an explicit placement
//!    list with `filled_volume`/`utilization`/`item_counts`; those values
//!    are used directly and per-item volume is the declared catalog
//!    volume times the count (never recomputed from placements).
//! 2. **Fallback**: only the cut tree is available; leaves are counted
//!    and summed per item.
//!
//! All maps key on [`ItemKey`], the canonical string form of the item
//! identifier, so counts merge correctly whether the id arrived as a
//! typed number or a JSON object key.

use crate::catalog::{find_item, CatalogItem};
use crate::tree::{BlockDims, CutNode, ItemKey};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-item usage within one result.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ItemUsage {
    /// Number of placed pieces.
    pub count: usize,
    /// Volume occupied by those pieces.
    pub volume: f64,
}

/// Aggregate fill/waste statistics for one result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutStats {
    /// Total stock volume (`L × W × H`).
    pub total_volume: f64,
    /// Volume occupied by placed items.
    pub total_filled: f64,
    /// `total_volume − total_filled`.
    pub total_waste: f64,
    /// Fill percentage; 0 when the stock volume is 0.
    pub fill_percent: f64,
    /// `100 − fill_percent`; 0 when the stock volume is 0.
    pub waste_percent: f64,
    /// Usage per item, keyed by canonical id.
    pub per_item: BTreeMap<ItemKey, ItemUsage>,
}

impl LayoutStats {
    fn from_totals(
        block: BlockDims,
        total_filled: f64,
        fill_percent: Option<f64>,
        per_item: BTreeMap<ItemKey, ItemUsage>,
    ) -> Self {
        let total_volume = block.volume();
        let (fill_percent, waste_percent) = if total_volume > 0.0 {
            let fill = fill_percent.unwrap_or(100.0 * total_filled / total_volume);
            (fill, 100.0 - fill)
        } else {
            (0.0, 0.0)
        };
        LayoutStats {
            total_volume,
            total_filled,
            total_waste: total_volume - total_filled,
            fill_percent,
            waste_percent,
            per_item,
        }
    }

    /// Authoritative mode: trusts the producer's `filled_volume`,
    /// `utilization` and `item_counts`. Per-item volume is derived from
    /// the catalog's declared dimensions; an item missing from the
    /// catalog contributes a zero volume (its count still shows).
    pub fn from_reported(
        block: BlockDims,
        filled_volume: f64,
        utilization: Option<f64>,
        item_counts: &BTreeMap<ItemKey, usize>,
        catalog: &[CatalogItem],
    ) -> Self {
        let mut per_item = BTreeMap::new();
        for (id, &count) in item_counts {
            let declared = match find_item(catalog, id) {
                Some(item) => item.volume(),
                None => {
                    log::debug!("item {} not in catalog; reporting zero volume", id);
                    0.0
                }
            };
            per_item.insert(
                id.clone(),
                ItemUsage {
                    count,
                    volume: declared * count as f64,
                },
            );
        }
        Self::from_totals(block, filled_volume, utilization, per_item)
    }

    /// Fallback mode: walks the canonical tree counting leaves. Every
    /// leaf counts once; degenerate leaves contribute zero volume.
    pub fn from_tree(block: BlockDims, root: &CutNode) -> Self {
        let mut per_item: BTreeMap<ItemKey, ItemUsage> = BTreeMap::new();
        let mut total_filled = 0.0;
        accumulate_leaves(root, &mut per_item, &mut total_filled);
        Self::from_totals(block, total_filled, None, per_item)
    }

    /// Total number of placed pieces across all items.
    pub fn placed_count(&self) -> usize {
        self.per_item.values().map(|u| u.count).sum()
    }
}

fn accumulate_leaves(
    node: &CutNode,
    per_item: &mut BTreeMap<ItemKey, ItemUsage>,
    total_filled: &mut f64,
) {
    match node {
        CutNode::Leaf {
            item_id,
            length,
            width,
            height,
        } => {
            let volume = length * width * height;
            let usage = per_item.entry(item_id.clone()).or_default();
            usage.count += 1;
            usage.volume += volume;
            *total_filled += volume;
        }
        CutNode::Cut { left, right, .. } => {
            accumulate_leaves(left, per_item, total_filled);
            accumulate_leaves(right, per_item, total_filled);
        }
        CutNode::Empty => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_catalog;
    use crate::reconstruct::reconstruct;
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
    fn test_authoritative_example() {
        // Catalog: one item type 100x50x30, qty 2. Block 200x100x60.
        let catalog = parse_catalog("1,100,50,30,2\n").unwrap();
        let block = BlockDims::new(200.0, 100.0, 60.0);
        let mut counts = BTreeMap::new();
        counts.insert(ItemKey::from(1), 2usize);

        let stats = LayoutStats::from_reported(block, 300_000.0, Some(25.0), &counts, &catalog);

        assert_eq!(stats.total_volume, 1_200_000.0);
        assert_eq!(stats.total_filled, 300_000.0);
        assert_eq!(stats.total_waste, 900_000.0);
        assert_eq!(stats.fill_percent, 25.0);
        assert_eq!(stats.waste_percent, 75.0);
        let usage = stats.per_item.get(&ItemKey::from(1)).unwrap();
        assert_eq!(usage.count, 2);
        assert_eq!(usage.volume, 300_000.0);
    }

    #[test]
    fn test_authoritative_without_producer_utilization() {
        let catalog = parse_catalog("1,100,50,30\n").unwrap();
        let block = BlockDims::new(200.0, 100.0, 60.0);
        let mut counts = BTreeMap::new();
        counts.insert(ItemKey::from(1), 1usize);

        let stats = LayoutStats::from_reported(block, 150_000.0, None, &counts, &catalog);
        assert!((stats.fill_percent - 12.5).abs() < 1e-9);
        assert!((stats.waste_percent - 87.5).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_counts_leaves() {
        let tree = cut(
            CutAxis::V,
            100.0,
            2.0,
            leaf(1, 100.0, 50.0, 30.0),
            leaf(1, 98.0, 50.0, 30.0),
        );
        let stats = LayoutStats::from_tree(BlockDims::new(200.0, 100.0, 60.0), &tree);
        let usage = stats.per_item.get(&ItemKey::from(1)).unwrap();
        assert_eq!(usage.count, 2);
        assert_eq!(stats.total_filled, 150_000.0 + 147_000.0);
        assert_eq!(stats.placed_count(), 2);
    }

    #[test]
    fn test_volume_conservation_against_reconstruction() {
        let tree = cut(
            CutAxis::V,
            100.0,
            2.0,
            cut(
                CutAxis::H,
                15.0,
                2.0,
                leaf(1, 100.0, 50.0, 15.0),
                leaf(2, 100.0, 50.0, 13.0),
            ),
            leaf(1, 98.0, 50.0, 30.0),
        );
        let placed_volume: f64 = reconstruct(&tree).iter().map(|p| p.volume()).sum();
        let stats = LayoutStats::from_tree(BlockDims::new(200.0, 100.0, 60.0), &tree);
        assert!((placed_volume - stats.total_filled).abs() < 1e-9);
    }

    #[test]
    fn test_zero_volume_block_guard() {
        let stats = LayoutStats::from_tree(BlockDims::new(0.0, 100.0, 60.0), &CutNode::Empty);
        assert_eq!(stats.fill_percent, 0.0);
        assert_eq!(stats.waste_percent, 0.0);
    }

    #[test]
    fn test_mixed_id_sources_merge() {
        // Counts keyed by a JSON-object string key and a typed numeric id
        // must land in the same bucket.
        let catalog = parse_catalog("3,10,10,10\n").unwrap();
        let block = BlockDims::new(100.0, 100.0, 100.0);
        let mut counts: BTreeMap<ItemKey, usize> = BTreeMap::new();
        counts.insert(ItemKey::new("3"), 2);
        let stats = LayoutStats::from_reported(block, 2000.0, None, &counts, &catalog);
        let usage = stats.per_item.get(&ItemKey::from(3)).unwrap();
        assert_eq!(usage.count, 2);
        assert_eq!(usage.volume, 2000.0);
    }

    #[test]
    fn test_item_missing_from_catalog_keeps_count() {
        let block = BlockDims::new(100.0, 100.0, 100.0);
        let mut counts = BTreeMap::new();
        counts.insert(ItemKey::from(42), 3usize);
        let stats = LayoutStats::from_reported(block, 0.0, None, &counts, &[]);
        let usage = stats.per_item.get(&ItemKey::from(42)).unwrap();
        assert_eq!(usage.count, 3);
        assert_eq!(usage.volume, 0.0);
    }

    #[test]
    fn test_degenerate_leaf_counts_but_adds_no_volume() {
        let tree = cut(
            CutAxis::V,
            10.0,
            0.0,
            leaf(1, 0.0, 5.0, 5.0),
            leaf(1, 10.0, 5.0, 5.0),
        );
        let stats = LayoutStats::from_tree(BlockDims::new(20.0, 5.0, 5.0), &tree);
        let usage = stats.per_item.get(&ItemKey::from(1)).unwrap();
        assert_eq!(usage.count, 2);
        assert_eq!(usage.volume, 250.0);
    }
}
