//! Wire models for the optimization service.
//!
//! The transport itself (HTTP client, retries, UI wiring) is an external
//! collaborator; these are the typed request and response bodies it
//! exchanges. Field names and defaults mirror the service contract:
//!
//! | Operation | Request | Response extras |
//! |---|---|---|
//! | manual optimize | [`OptimizeRequest`] | none |
//! | database-assisted optimize | [`FindBestBlockRequest`] | `best_block` |
//! | reverse (auto block-size) optimize | [`ReverseOptimizeRequest`] | `best_block_size` |
//! | block catalog lookup | `material` query param | [`BlocksResponse`] |

use crate::catalog::CatalogItem;
use crate::reconstruct::PlacedItem;
use crate::tree::{BlockDims, Dims3, ItemKey, Point3};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Stock block extents as the service spells them (`L`/`W`/`H`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockSize {
    #[serde(rename = "L")]
    pub length: f64,
    #[serde(rename = "W")]
    pub width: f64,
    #[serde(rename = "H")]
    pub height: f64,
}

impl From<BlockSize> for BlockDims {
    fn from(b: BlockSize) -> Self {
        BlockDims::new(b.length, b.width, b.height)
    }
}

impl From<BlockDims> for BlockSize {
    fn from(b: BlockDims) -> Self {
        BlockSize {
            length: b.length,
            width: b.width,
            height: b.height,
        }
    }
}

/// One requested item type in an optimize request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemModel {
    pub id: ItemKey,
    pub l: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default = "default_qty")]
    pub qty: usize,
}

fn default_qty() -> usize {
    1
}

impl From<&CatalogItem> for ItemModel {
    fn from(item: &CatalogItem) -> Self {
        ItemModel {
            id: item.id.clone(),
            l: item.length,
            w: item.width,
            h: item.height,
            qty: item.quantity,
        }
    }
}

/// Technology parameters. Defaults match the service's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechParams {
    pub kerf: f64,
    pub max_cut_length: f64,
    pub min_part_size: f64,
    pub allow_rotations: bool,
}

impl Default for TechParams {
    fn default() -> Self {
        TechParams {
            kerf: 4.0,
            max_cut_length: 1400.0,
            min_part_size: 15.0,
            allow_rotations: true,
        }
    }
}

/// Manual optimization against a known block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub block: BlockSize,
    pub items: Vec<ItemModel>,
    #[serde(default)]
    pub tech: TechParams,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

fn default_iterations() -> u32 {
    1
}

/// Database-assisted optimization: the service picks the best stocked
/// block, optionally filtered by material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindBestBlockRequest {
    pub items: Vec<ItemModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default)]
    pub tech: TechParams,
    #[serde(default = "default_best_block_iterations")]
    pub iterations: u32,
}

fn default_best_block_iterations() -> u32 {
    3
}

/// Reverse optimization: the service searches for the smallest block
/// reaching the target utilization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReverseOptimizeRequest {
    pub items: Vec<ItemModel>,
    #[serde(default)]
    pub tech: TechParams,
    #[serde(default = "default_target_utilization")]
    pub target_utilization: f64,
}

fn default_target_utilization() -> f64 {
    8.0
}

/// One placed item as the service reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItemRecord {
    pub item_id: ItemKey,
    pub position: Point3,
    pub dimensions: Dims3,
}

impl PlacedItemRecord {
    /// Converts into the core placement type.
    pub fn into_placed_item(self) -> PlacedItem {
        PlacedItem {
            item_id: self.item_id,
            origin: self.position,
            dimensions: self.dimensions,
        }
    }
}

/// A stocked block from the warehouse catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: i64,
    pub material: String,
    #[serde(default)]
    pub grade: Option<String>,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub volume: Option<f64>,
    pub quantity: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl BlockRecord {
    /// Extents of this block.
    pub fn dims(&self) -> BlockDims {
        BlockDims::new(self.length, self.width, self.height)
    }
}

/// Response of the block catalog lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlocksResponse {
    pub blocks: Vec<BlockRecord>,
}

/// The optimization result body, shared by all three optimize
/// operations. Tree payloads stay as raw JSON here; the schema
/// normalizer turns them into the canonical form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptimizeResponse {
    #[serde(default)]
    pub filled_volume: f64,
    #[serde(default)]
    pub utilization: Option<f64>,
    #[serde(default)]
    pub waste: Option<f64>,
    #[serde(default)]
    pub value: Option<f64>,
    /// Stock extents as an `[L, W, H]` triple (manual optimize).
    #[serde(default)]
    pub block: Option<[f64; 3]>,
    #[serde(default)]
    pub item_counts: BTreeMap<ItemKey, usize>,
    #[serde(default)]
    pub items_placed: Vec<PlacedItemRecord>,
    /// Raw pattern tree ("current" encoding).
    #[serde(default)]
    pub tree: Option<Value>,
    /// Raw sequenced cut tree (`sequence`/`conflicts`/totals shape).
    #[serde(default)]
    pub cutting_tree: Option<Value>,
    #[serde(default)]
    pub computation_time: Option<f64>,
    /// Database-assisted optimize only.
    #[serde(default)]
    pub best_block: Option<BlockRecord>,
    /// Reverse optimize only.
    #[serde(default)]
    pub best_block_size: Option<BlockSize>,
}

impl OptimizeResponse {
    /// Stock extents for this result, wherever the operation put them:
    /// the `block` triple, then `best_block_size`, then `best_block`.
    pub fn block_dims(&self) -> Option<BlockDims> {
        if let Some([l, w, h]) = self.block {
            return Some(BlockDims::new(l, w, h));
        }
        if let Some(size) = self.best_block_size {
            return Some(size.into());
        }
        self.best_block.as_ref().map(BlockRecord::dims)
    }

    /// True when the producer supplied an explicit placement list, i.e.
    /// statistics can run in authoritative mode.
    pub fn has_authoritative_placements(&self) -> bool {
        !self.items_placed.is_empty()
    }
}
