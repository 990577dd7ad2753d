//! Dense cell ids for a bounded cube.
//!
//! [`CubeIndexer`] maps every coordinate of the cube `[-radius, radius)³` to a
//! [`CellId`] such that stepping one cell along X, Y or Z adds a fixed stride
//! (`1`, `W`, `W²`) to the id. Hull sets and maps are keyed by these ids, so
//! neighbor lookups never go through a decode/encode round-trip.
//!
//! The id space is padded by one cell on every side. Neighbors of in-range
//! cells therefore always have distinct ids, and the padding ids can never be
//! occupied, which makes "outside the cube" read as "empty".

use crate::bounds::GridBounds;
use crate::config::DEFAULT_RADIUS;
use crate::error::{HullError, HullResult};
use crate::voxel::{Direction, VoxelCoord};

/// Dense id of a cell inside a [`CubeIndexer`]'s cube.
///
/// Ids are only minted by the indexer. They are meaningful only for the
/// indexer (and radius) that produced them, so they are not serializable;
/// persist the [`VoxelCoord`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u64);

impl CellId {
    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Bijection between cube coordinates and [`CellId`]s.
///
/// # Example
///
/// ```
/// use cf_hull::{CubeIndexer, Direction, VoxelCoord};
///
/// let indexer = CubeIndexer::new(16).unwrap();
/// let id = indexer.encode(VoxelCoord::new(3, -4, 5)).unwrap();
/// assert_eq!(indexer.decode(id), VoxelCoord::new(3, -4, 5));
///
/// let up = indexer.step(id, Direction::PosY);
/// assert_eq!(indexer.decode(up), VoxelCoord::new(3, -3, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeIndexer {
    radius: i32,
    width: u64,
    strides: [u64; 3],
}

impl Default for CubeIndexer {
    fn default() -> Self {
        // The default radius is far below the overflow limit.
        let width = 2 * u64::from(DEFAULT_RADIUS.unsigned_abs()) + 2;
        Self {
            radius: DEFAULT_RADIUS,
            width,
            strides: [1, width, width * width],
        }
    }
}

impl CubeIndexer {
    /// Creates an indexer for the cube `[-radius, radius)³`.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::InvalidRadius`] if `radius` is not positive or the
    /// padded id space does not fit in a `u64`.
    pub fn new(radius: i32) -> HullResult<Self> {
        if radius <= 0 {
            return Err(HullError::InvalidRadius(radius));
        }
        let width = 2 * u64::from(radius.unsigned_abs()) + 2;
        let plane = width
            .checked_mul(width)
            .ok_or(HullError::InvalidRadius(radius))?;
        plane
            .checked_mul(width)
            .ok_or(HullError::InvalidRadius(radius))?;

        Ok(Self {
            radius,
            width,
            strides: [1, width, plane],
        })
    }

    /// Cube radius.
    #[must_use]
    pub const fn radius(&self) -> i32 {
        self.radius
    }

    /// Returns `true` if `coord` lies inside the cube.
    #[must_use]
    pub const fn contains(&self, coord: VoxelCoord) -> bool {
        let r = self.radius;
        coord.x >= -r
            && coord.x < r
            && coord.y >= -r
            && coord.y < r
            && coord.z >= -r
            && coord.z < r
    }

    /// Inclusive bounds of the cube.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        let r = self.radius;
        GridBounds {
            min: VoxelCoord::new(-r, -r, -r),
            max: VoxelCoord::new(r - 1, r - 1, r - 1),
        }
    }

    /// Encodes a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::OutOfBounds`] if `coord` lies outside the cube.
    pub fn encode(&self, coord: VoxelCoord) -> HullResult<CellId> {
        if !self.contains(coord) {
            return Err(HullError::OutOfBounds {
                coord,
                radius: self.radius,
            });
        }
        Ok(CellId(
            self.shift(coord.x)
                + self.shift(coord.y) * self.strides[1]
                + self.shift(coord.z) * self.strides[2],
        ))
    }

    /// Decodes an id back to its coordinate.
    ///
    /// Ids of the padding shell decode to the coordinate just outside the
    /// cube.
    #[must_use]
    pub fn decode(&self, id: CellId) -> VoxelCoord {
        let raw = id.0;
        VoxelCoord::new(
            self.unshift(raw % self.width),
            self.unshift((raw / self.width) % self.width),
            self.unshift(raw / self.strides[2]),
        )
    }

    /// Id of the face-adjacent neighbor in `direction`.
    #[must_use]
    pub const fn step(&self, id: CellId, direction: Direction) -> CellId {
        let stride = self.strides[direction.axis().index()];
        if direction.is_positive() {
            CellId(id.0.wrapping_add(stride))
        } else {
            CellId(id.0.wrapping_sub(stride))
        }
    }

    // Offsets are in [1, 2r] for in-range components.
    fn shift(&self, component: i32) -> u64 {
        (i64::from(component) + i64::from(self.radius) + 1).unsigned_abs()
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn unshift(&self, offset: u64) -> i32 {
        (offset as i64 - i64::from(self.radius) - 1) as i32
    }
}
