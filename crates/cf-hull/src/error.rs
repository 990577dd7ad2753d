//! Error types for hull operations.

use crate::VoxelCoord;

/// Result type for hull operations.
pub type HullResult<T> = Result<T, HullError>;

/// Errors that can occur when configuring or mutating a hull.
///
/// All hull operations are total over in-range coordinates. The only failures
/// are configuration mistakes and coordinates outside the indexed cube.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum HullError {
    /// A coordinate lies outside the cube covered by the indexer.
    #[error("coordinate {coord:?} is outside the indexed cube of radius {radius}")]
    OutOfBounds {
        /// The rejected coordinate.
        coord: VoxelCoord,
        /// Radius of the indexed cube.
        radius: i32,
    },

    /// The cube radius must be positive and small enough to index.
    #[error("invalid cube radius {0}")]
    InvalidRadius(i32),

    /// Tiles of the face index must be at least one cell wide.
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(i32),

    /// The ray caster needs at least one step.
    #[error("ray step limit must be positive")]
    InvalidRayStepLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message() {
        let err = HullError::OutOfBounds {
            coord: VoxelCoord::new(900, 0, 0),
            radius: 800,
        };
        let msg = err.to_string();
        assert!(msg.contains("900"));
        assert!(msg.contains("800"));
    }

    #[test]
    fn test_invalid_radius_message() {
        assert_eq!(
            HullError::InvalidRadius(-3).to_string(),
            "invalid cube radius -3"
        );
    }
}
