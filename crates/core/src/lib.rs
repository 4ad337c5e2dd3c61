//! # AlmaCut Core
//!
//! Core library for rendering 3D guillotine cutting layouts. The
//! optimization itself runs in an external service; this crate turns
//! the service's declarative responses into geometry, statistics, and
//! operator-facing reports.
//!
//! ## Core Components
//!
//! - **Canonical tree**: [`CutNode`], [`CutAxis`], [`ItemKey`] - one
//!   in-memory form for every tree encoding the service emits
//! - **Schema normalizer**: [`normalize_tree`] - folds both wire
//!   encodings into the canonical tree, tolerantly
//! - **Geometry reconstructor**: [`reconstruct`] - kerf-aware absolute
//!   placements from the canonical tree
//! - **Cutting program**: [`CuttingProgram`], [`format_program`] - the
//!   sequenced operation list as a text report
//! - **Statistics**: [`LayoutStats`] - fill/waste totals and per-item
//!   usage, authoritative or tree-derived
//! - **Colors**: [`item_color`] - deterministic per-item palette shared
//!   by the 3D view and the report table
//! - **Session**: [`RenderSession`] - everything derived from a single
//!   result, plus [`RequestSlot`] for the one-request-at-a-time policy
//! - **Wire models**: [`OptimizeRequest`], [`OptimizeResponse`] and
//!   friends, matching the service contract field for field
//!
//! ## Axis Convention
//!
//! Cut axes map to spatial dimensions once, here, for everyone:
//!
//! | Axis | Splits | Offset dimension |
//! |------|--------|------------------|
//! | `V`  | length | x |
//! | `D`  | width  | y |
//! | `H`  | height | z |
//!
//! ## Example
//!
//! ```rust
//! use almacut_core::{normalize_tree, reconstruct};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "cut_dir": "V", "cut_pos": 100.0,
//!     "left_pattern":  {"item_id": 1, "length": 100.0, "width": 50.0, "height": 30.0},
//!     "right_pattern": {"item_id": 1, "length": 100.0, "width": 50.0, "height": 30.0}
//! });
//! let tree = normalize_tree(&raw, 2.0);
//! let placed = reconstruct(&tree);
//! assert_eq!(placed.len(), 2);
//! assert_eq!(placed[1].origin.x, 102.0);
//! ```

pub mod catalog;
pub mod color;
pub mod error;
pub mod program;
pub mod reconstruct;
pub mod schema;
pub mod session;
pub mod stats;
pub mod tree;
pub mod wire;

pub use catalog::{find_item, parse_catalog, CatalogItem};
pub use color::{item_color, Rgb};
pub use error::{Error, Result};
pub use program::{format_program, Conflict, CuttingProgram, Operation, ProgramTotals, Step};
pub use reconstruct::{reconstruct, PlacedItem};
pub use schema::normalize_tree;
pub use session::{PendingRequest, RenderSession, RequestSlot};
pub use stats::{ItemUsage, LayoutStats};
pub use tree::{BlockDims, CutAxis, CutNode, Dims3, ItemKey, Point3};
pub use wire::{
    BlockRecord, BlockSize, BlocksResponse, FindBestBlockRequest, ItemModel, OptimizeRequest,
    OptimizeResponse, PlacedItemRecord, ReverseOptimizeRequest, TechParams,
};
