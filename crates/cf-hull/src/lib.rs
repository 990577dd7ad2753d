//! Incremental voxel hull tracking for interactive voxel editors.
//!
//! This crate tracks, for a sparse set of occupied cells on a bounded integer
//! grid, which cell faces are exposed, which of them changed since a consumer
//! last looked, and how rays and cavities relate to that surface:
//!
//! - [`CubeIndexer`] / [`CellId`] - Dense ids with O(1) neighbor arithmetic
//! - [`HullManager`] - Occupancy, per-direction border sets and face diffs
//! - [`Ray`] and [`hit_test`] - Ray casting against exposed faces only
//! - [`ExteriorClassification`] - Sheet detection and cavity classification
//! - [`FaceIndex`] - Faces bucketed by plane and tile with dirty tracking
//!
//! # Data Flow
//!
//! Edits call [`HullManager::update`] and [`HullManager::clear_position`],
//! which update the border sets in place and buffer the net change per
//! direction. A render tick drains the diffs (directly, or through
//! [`FaceIndex::sync`]) and rebuilds the dirty tiles reported by
//! [`FaceIndex::take_invalid_tiles`], a bounded number per tick.
//!
//! All mutation happens on one thread. Diffs are drained destructively and
//! assume a single consumer per direction.
//!
//! # Coordinate System
//!
//! Cells are integer triples in `[-radius, radius)` on every axis (radius 800
//! by default). Cell `(x, y, z)` covers the unit box
//! `[x, x+1) × [y, y+1) × [z, z+1)` in ray space. A face is named by the cell
//! owning it and its outward [`Direction`].
//!
//! # Example
//!
//! ```
//! use cf_hull::{Direction, HullManager, VoxelCoord};
//!
//! let mut hull: HullManager<&str> = HullManager::default();
//! for x in 0..10 {
//!     for y in 0..10 {
//!         for z in 0..10 {
//!             hull.update(VoxelCoord::new(x, y, z), "stone").unwrap();
//!         }
//!     }
//! }
//!
//! for direction in Direction::ALL {
//!     assert_eq!(hull.take_hull_additions(direction).len(), 100);
//!     assert!(hull.take_hull_removals(direction).is_empty());
//! }
//!
//! // Carve a notch into the +X side.
//! hull.clear_position(VoxelCoord::new(9, 5, 5)).unwrap();
//! assert_eq!(hull.take_hull_removals(Direction::PosX).len(), 1);
//! assert_eq!(hull.take_hull_additions(Direction::PosX).len(), 1);
//! ```
//!
//! # Hole Detection
//!
//! ```
//! use cf_hull::{Direction, HullManager, VoxelCoord};
//!
//! let mut hull: HullManager<()> = HullManager::default();
//! for x in 0..10 {
//!     for y in 0..10 {
//!         for z in 0..10 {
//!             let on_shell = [x, y, z].iter().any(|&c| c == 0 || c == 9);
//!             if on_shell {
//!                 hull.update(VoxelCoord::new(x, y, z), ()).unwrap();
//!             }
//!         }
//!     }
//! }
//!
//! let classification = hull.compute_exterior();
//! assert!(classification.has_interior());
//! assert_eq!(classification.exterior_hull(Direction::NegY).len(), 100);
//! assert_eq!(classification.empty_interior().len(), 512);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod config;
mod diff;
mod error;
mod exterior;
mod face_index;
mod hull;
mod indexer;
mod raycast;
mod voxel;

// Re-export core types
pub use bounds::{GridBounds, GridBoundsIter};
pub use config::{
    DEFAULT_MAX_RAY_STEPS, DEFAULT_RADIUS, DEFAULT_TILE_OFFSET, DEFAULT_TILE_SIZE,
    FaceIndexConfig, HullConfig, IndexView,
};
pub use diff::FaceChange;
pub use error::{HullError, HullResult};
pub use exterior::ExteriorClassification;
pub use face_index::{BorderQuery, DirtyTile, FaceIndex, Refresh, SyncSummary, TileId};
pub use hull::HullManager;
pub use indexer::{CellId, CubeIndexer};
pub use raycast::{HullHit, Ray, hit_test};
pub use voxel::{Axis, Direction, VoxelCoord};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
