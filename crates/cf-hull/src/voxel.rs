//! Voxel coordinates, axes and face directions.

/// A discrete 3D cell coordinate.
///
/// A cell at `(x, y, z)` covers the unit box `[x, x+1) × [y, y+1) × [z, z+1)`.
///
/// # Example
///
/// ```
/// use cf_hull::{Direction, VoxelCoord};
///
/// let coord = VoxelCoord::new(1, 2, 3);
/// assert_eq!(coord.step(Direction::PosX), VoxelCoord::new(2, 2, 3));
/// assert_eq!(coord.step(Direction::NegZ), VoxelCoord::new(1, 2, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelCoord {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl VoxelCoord {
    /// Creates a new voxel coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Creates a coordinate at the origin (0, 0, 0).
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0, 0, 0)
    }

    /// Returns the coordinate as an array.
    #[must_use]
    pub const fn as_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    /// Returns the component along `axis`.
    ///
    /// # Example
    ///
    /// ```
    /// use cf_hull::{Axis, VoxelCoord};
    ///
    /// let coord = VoxelCoord::new(4, 5, 6);
    /// assert_eq!(coord.component(Axis::Y), 5);
    /// ```
    #[must_use]
    pub const fn component(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Returns the face-adjacent neighbor in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let [dx, dy, dz] = direction.offset();
        Self::new(
            self.x.wrapping_add(dx),
            self.y.wrapping_add(dy),
            self.z.wrapping_add(dz),
        )
    }
}

impl From<(i32, i32, i32)> for VoxelCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[i32; 3]> for VoxelCoord {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<VoxelCoord> for [i32; 3] {
    fn from(coord: VoxelCoord) -> Self {
        coord.as_array()
    }
}

impl std::ops::Add for VoxelCoord {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(
            self.x.wrapping_add(other.x),
            self.y.wrapping_add(other.y),
            self.z.wrapping_add(other.z),
        )
    }
}

impl std::ops::Sub for VoxelCoord {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(
            self.x.wrapping_sub(other.x),
            self.y.wrapping_sub(other.y),
            self.z.wrapping_sub(other.z),
        )
    }
}

/// One of the three grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// All axes in X, Y, Z order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Index of this axis (0 for X, 1 for Y, 2 for Z).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// The direction pointing toward negative coordinates on this axis.
    #[must_use]
    pub const fn negative(self) -> Direction {
        match self {
            Self::X => Direction::NegX,
            Self::Y => Direction::NegY,
            Self::Z => Direction::NegZ,
        }
    }

    /// The direction pointing toward positive coordinates on this axis.
    #[must_use]
    pub const fn positive(self) -> Direction {
        match self {
            Self::X => Direction::PosX,
            Self::Y => Direction::PosY,
            Self::Z => Direction::PosZ,
        }
    }

    /// The two axes perpendicular to this one, in ascending order.
    #[must_use]
    pub const fn perpendicular(self) -> [Self; 2] {
        match self {
            Self::X => [Self::Y, Self::Z],
            Self::Y => [Self::X, Self::Z],
            Self::Z => [Self::X, Self::Y],
        }
    }
}

/// One of the six axis-aligned face orientations.
///
/// A cell's face in direction `d` is the face whose outward normal points
/// along `d`. The face is on the hull when the neighbor in direction `d` is
/// empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Toward -X.
    NegX,
    /// Toward +X.
    PosX,
    /// Toward -Y.
    NegY,
    /// Toward +Y.
    PosY,
    /// Toward -Z.
    NegZ,
    /// Toward +Z.
    PosZ,
}

impl Direction {
    /// All six directions in index order.
    pub const ALL: [Self; 6] = [
        Self::NegX,
        Self::PosX,
        Self::NegY,
        Self::PosY,
        Self::NegZ,
        Self::PosZ,
    ];

    /// Index of this direction in [`Direction::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::NegX => 0,
            Self::PosX => 1,
            Self::NegY => 2,
            Self::PosY => 3,
            Self::NegZ => 4,
            Self::PosZ => 5,
        }
    }

    /// The axis this direction runs along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::NegX | Self::PosX => Axis::X,
            Self::NegY | Self::PosY => Axis::Y,
            Self::NegZ | Self::PosZ => Axis::Z,
        }
    }

    /// Returns `true` for the `Pos*` directions.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::PosX | Self::PosY | Self::PosZ)
    }

    /// The direction pointing the other way along the same axis.
    ///
    /// # Example
    ///
    /// ```
    /// use cf_hull::Direction;
    ///
    /// assert_eq!(Direction::PosY.opposite(), Direction::NegY);
    /// ```
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::NegX => Self::PosX,
            Self::PosX => Self::NegX,
            Self::NegY => Self::PosY,
            Self::PosY => Self::NegY,
            Self::NegZ => Self::PosZ,
            Self::PosZ => Self::NegZ,
        }
    }

    /// Unit offset of this direction.
    #[must_use]
    pub const fn offset(self) -> [i32; 3] {
        match self {
            Self::NegX => [-1, 0, 0],
            Self::PosX => [1, 0, 0],
            Self::NegY => [0, -1, 0],
            Self::PosY => [0, 1, 0],
            Self::NegZ => [0, 0, -1],
            Self::PosZ => [0, 0, 1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let coord = VoxelCoord::new(1, -2, 3);
        assert_eq!(coord.as_array(), [1, -2, 3]);
        assert_eq!(VoxelCoord::origin(), VoxelCoord::default());
    }

    #[test]
    fn test_component() {
        let coord = VoxelCoord::new(7, 8, 9);
        assert_eq!(coord.component(Axis::X), 7);
        assert_eq!(coord.component(Axis::Y), 8);
        assert_eq!(coord.component(Axis::Z), 9);
    }

    #[test]
    fn test_step_matches_offset() {
        let coord = VoxelCoord::new(5, 5, 5);
        for direction in Direction::ALL {
            let next = coord.step(direction);
            assert_eq!((next - coord).as_array(), direction.offset());
            assert_eq!(next.step(direction.opposite()), coord);
        }
    }

    #[test]
    fn test_direction_index_roundtrip() {
        for (i, direction) in Direction::ALL.iter().enumerate() {
            assert_eq!(direction.index(), i);
        }
    }

    #[test]
    fn test_direction_axis_and_sign() {
        for axis in Axis::ALL {
            assert_eq!(axis.positive().axis(), axis);
            assert_eq!(axis.negative().axis(), axis);
            assert!(axis.positive().is_positive());
            assert!(!axis.negative().is_positive());
            assert_eq!(axis.positive().opposite(), axis.negative());
        }
    }

    #[test]
    fn test_perpendicular_axes() {
        for axis in Axis::ALL {
            let [a, b] = axis.perpendicular();
            assert_ne!(a, axis);
            assert_ne!(b, axis);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_add_sub() {
        let a = VoxelCoord::new(1, 2, 3);
        let b = VoxelCoord::new(4, 5, 6);
        assert_eq!(a + b, VoxelCoord::new(5, 7, 9));
        assert_eq!(b - a, VoxelCoord::new(3, 3, 3));
    }

    #[test]
    fn test_conversions() {
        let coord: VoxelCoord = (1, 2, 3).into();
        assert_eq!(coord, VoxelCoord::from([1, 2, 3]));
        let array: [i32; 3] = coord.into();
        assert_eq!(array, [1, 2, 3]);
    }
}
