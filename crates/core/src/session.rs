//! Per-result render session.
//!
//! One [`RenderSession`] owns everything derived from a single
//! optimization result: the canonical tree, the reconstructed placements,
//! the per-item color map, statistics, and the cutting program. Building
//! a new session fully replaces the previous one; nothing is merged
//! across results, so scene resources follow a strict acquire/release per
//! result.
//!
//! [`RequestSlot`] holds the companion policy for triggering: one
//! in-flight optimization request at a time, further triggers ignored
//! until the active one completes or fails.

use crate::catalog::CatalogItem;
use crate::color::{item_color, Rgb};
use crate::program::{format_program, CuttingProgram};
use crate::reconstruct::{reconstruct, PlacedItem};
use crate::schema::normalize_tree;
use crate::stats::LayoutStats;
use crate::tree::{BlockDims, CutNode, ItemKey};
use crate::wire::OptimizeResponse;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Everything the render and report layers need for one result.
#[derive(Debug)]
pub struct RenderSession {
    /// Stock extents for this result.
    pub block: BlockDims,
    /// Technology kerf applied when normalizing the tree.
    pub kerf: f64,
    /// Canonical cut tree (possibly `Empty`).
    pub tree: CutNode,
    /// Item placements, authoritative when the producer listed them,
    /// reconstructed from the tree otherwise.
    pub placements: Vec<PlacedItem>,
    /// Color per item, assigned by first-seen placement order. The 3D
    /// view and the report table both read from here.
    pub colors: HashMap<ItemKey, Rgb>,
    /// Fill/waste statistics.
    pub stats: LayoutStats,
    /// Parsed cutting program, when the producer shipped one.
    pub program: Option<CuttingProgram>,
}

impl RenderSession {
    /// Builds a session from an optimizer response.
    ///
    /// `block` overrides the response's own extents when given (the
    /// manual-optimize flow knows the block it asked about); otherwise
    /// the response must carry them. `catalog` feeds authoritative-mode
    /// per-item volumes.
    pub fn build(
        response: &OptimizeResponse,
        block: Option<BlockDims>,
        kerf: f64,
        catalog: &[CatalogItem],
    ) -> RenderSession {
        let block = block
            .or_else(|| response.block_dims())
            .unwrap_or(BlockDims::new(0.0, 0.0, 0.0));

        let tree = response
            .tree
            .as_ref()
            .map(|raw| normalize_tree(raw, kerf))
            .unwrap_or(CutNode::Empty);

        let placements: Vec<PlacedItem> = if response.has_authoritative_placements() {
            response
                .items_placed
                .iter()
                .cloned()
                .map(|record| record.into_placed_item())
                .collect()
        } else {
            reconstruct(&tree)
        };

        let stats = if response.has_authoritative_placements() {
            LayoutStats::from_reported(
                block,
                response.filled_volume,
                response.utilization,
                &response.item_counts,
                catalog,
            )
        } else {
            LayoutStats::from_tree(block, &tree)
        };

        let colors = assign_colors(&placements);

        let program = response.cutting_tree.as_ref().map(CuttingProgram::from_value);

        RenderSession {
            block,
            kerf,
            tree,
            placements,
            colors,
            stats,
            program,
        }
    }

    /// Color of an item within this session, if it was placed.
    pub fn color_of(&self, id: &ItemKey) -> Option<Rgb> {
        self.colors.get(id).copied()
    }

    /// Renders the full text report: cutting program (when present),
    /// then the per-item table and the fill summary.
    pub fn report(&self) -> String {
        let mut out = String::new();

        if let Some(program) = &self.program {
            out.push_str(&format_program(program));
            out.push('\n');
        }

        let _ = writeln!(
            out,
            "Block {:.0}x{:.0}x{:.0} mm, kerf {:.1} mm",
            self.block.length, self.block.width, self.block.height, self.kerf
        );
        let _ = writeln!(out, "item     count      volume  color");
        for (id, usage) in &self.stats.per_item {
            let color = self
                .color_of(id)
                .map(|c| c.to_hex())
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "{:<8} {:>5} {:>11.0}  {}",
                id.to_string(),
                usage.count,
                usage.volume,
                color
            );
        }
        let _ = writeln!(
            out,
            "filled {:.0} of {:.0} mm3 ({:.1}% fill, {:.1}% waste)",
            self.stats.total_filled,
            self.stats.total_volume,
            self.stats.fill_percent,
            self.stats.waste_percent
        );

        out
    }
}

/// Assigns colors by first-seen placement order, one palette slot per
/// distinct item.
fn assign_colors(placements: &[PlacedItem]) -> HashMap<ItemKey, Rgb> {
    let mut colors = HashMap::new();
    for placed in placements {
        let next_index = colors.len();
        colors
            .entry(placed.item_id.clone())
            .or_insert_with(|| item_color(&placed.item_id, next_index));
    }
    colors
}

/// Guard for the one-request-at-a-time trigger policy.
///
/// Single-threaded: the render cycle has a single writer, so a `Cell`
/// suffices.
#[derive(Debug, Default)]
pub struct RequestSlot {
    busy: Cell<bool>,
}

impl RequestSlot {
    /// Creates an idle slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot. Returns `None` while a request is pending, in
    /// which case the trigger must be ignored.
    pub fn try_begin(&self) -> Option<PendingRequest<'_>> {
        if self.busy.get() {
            return None;
        }
        self.busy.set(true);
        Some(PendingRequest { slot: self })
    }

    /// True while a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

/// Token for an in-flight request. Dropping it releases the slot, so
/// every completion path (success, transport error, malformed body)
/// re-enables triggering.
#[derive(Debug)]
pub struct PendingRequest<'a> {
    slot: &'a RequestSlot,
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        self.slot.busy.set(false);
    }
}
