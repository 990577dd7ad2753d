//! Configuration for hull managers and face indices.
//!
//! Both configurations are plain values with sensible defaults and `with_*`
//! builders. Validation happens when a [`HullManager`](crate::HullManager) or
//! [`FaceIndex`](crate::FaceIndex) is constructed.
//!
//! # Example
//!
//! ```
//! use cf_hull::{Direction, FaceIndexConfig, HullConfig, IndexView};
//!
//! let hull = HullConfig::default().with_radius(64);
//! assert!(hull.validate().is_ok());
//!
//! let side = FaceIndexConfig::default().with_view(IndexView::Side(Direction::PosZ));
//! assert!(!side.view.accepts(Direction::PosX));
//! ```

use crate::error::{HullError, HullResult};
use crate::voxel::Direction;

/// Default cube radius: coordinates span `[-800, 800)` on every axis.
pub const DEFAULT_RADIUS: i32 = 800;

/// Default ray step limit (three times the default cube width).
pub const DEFAULT_MAX_RAY_STEPS: usize = 4800;

/// Default tile edge length of the face index.
pub const DEFAULT_TILE_SIZE: i32 = 13;

/// Default shift applied to in-plane positions before tiling.
pub const DEFAULT_TILE_OFFSET: i32 = 6;

/// Configuration of a [`HullManager`](crate::HullManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HullConfig {
    /// Cube radius; valid coordinates are `[-radius, radius)`.
    pub radius: i32,

    /// Maximum number of cells a hit test walks before giving up.
    pub max_ray_steps: usize,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            max_ray_steps: DEFAULT_MAX_RAY_STEPS,
        }
    }
}

impl HullConfig {
    /// Sets the cube radius.
    #[must_use]
    pub const fn with_radius(mut self, radius: i32) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the ray step limit.
    #[must_use]
    pub const fn with_max_ray_steps(mut self, steps: usize) -> Self {
        self.max_ray_steps = steps;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::InvalidRadius`] for a non-positive radius and
    /// [`HullError::InvalidRayStepLimit`] for a zero step limit.
    pub const fn validate(&self) -> HullResult<()> {
        if self.radius <= 0 {
            return Err(HullError::InvalidRadius(self.radius));
        }
        if self.max_ray_steps == 0 {
            return Err(HullError::InvalidRayStepLimit);
        }
        Ok(())
    }
}

/// Which faces a [`FaceIndex`](crate::FaceIndex) tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexView {
    /// Free 3D view: all orientations, and edits also invalidate
    /// neighboring tiles that hold an abutting hull face.
    #[default]
    Perspective,

    /// Orthographic side view: only faces pointing in the given direction,
    /// and only the tile of the edited face is invalidated.
    Side(Direction),
}

impl IndexView {
    /// Returns `true` if faces in `direction` belong to this view.
    #[must_use]
    pub fn accepts(self, direction: Direction) -> bool {
        match self {
            Self::Perspective => true,
            Self::Side(side) => side == direction,
        }
    }
}

/// Configuration of a [`FaceIndex`](crate::FaceIndex).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceIndexConfig {
    /// Tile edge length in cells.
    pub tile_size: i32,

    /// Shift applied to in-plane positions before dividing by the tile size,
    /// so the origin sits in the middle of a tile.
    pub tile_offset: i32,

    /// Which faces are tracked.
    pub view: IndexView,
}

impl Default for FaceIndexConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            tile_offset: DEFAULT_TILE_OFFSET,
            view: IndexView::Perspective,
        }
    }
}

impl FaceIndexConfig {
    /// Sets the tile size and offset.
    #[must_use]
    pub const fn with_tiles(mut self, size: i32, offset: i32) -> Self {
        self.tile_size = size;
        self.tile_offset = offset;
        self
    }

    /// Sets the view.
    #[must_use]
    pub const fn with_view(mut self, view: IndexView) -> Self {
        self.view = view;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::InvalidTileSize`] if the tile size is not positive.
    pub const fn validate(&self) -> HullResult<()> {
        if self.tile_size <= 0 {
            return Err(HullError::InvalidTileSize(self.tile_size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hull_defaults() {
        let config = HullConfig::default();
        assert_eq!(config.radius, 800);
        assert_eq!(config.max_ray_steps, 4800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hull_invalid() {
        assert_eq!(
            HullConfig::default().with_radius(0).validate(),
            Err(HullError::InvalidRadius(0))
        );
        assert_eq!(
            HullConfig::default().with_max_ray_steps(0).validate(),
            Err(HullError::InvalidRayStepLimit)
        );
    }

    #[test]
    fn test_face_index_defaults() {
        let config = FaceIndexConfig::default();
        assert_eq!(config.tile_size, 13);
        assert_eq!(config.tile_offset, 6);
        assert_eq!(config.view, IndexView::Perspective);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_face_index_invalid_tile() {
        assert_eq!(
            FaceIndexConfig::default().with_tiles(0, 0).validate(),
            Err(HullError::InvalidTileSize(0))
        );
    }

    #[test]
    fn test_view_accepts() {
        for direction in Direction::ALL {
            assert!(IndexView::Perspective.accepts(direction));
        }
        let side = IndexView::Side(Direction::NegY);
        assert!(side.accepts(Direction::NegY));
        assert!(!side.accepts(Direction::PosY));
    }
}
