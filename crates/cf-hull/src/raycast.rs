//! Ray casting against hull faces.
//!
//! The caster walks the cells crossed by a ray with a grid traversal in the
//! style of Amanatides & Woo. After each step it checks whether the entered
//! cell exposes the face the ray crossed to get in. Only exposed faces count,
//! so a ray starting inside a solid block passes through it until it reaches
//! a visible face.
//!
//! # Algorithm
//!
//! For each axis with a non-zero direction component, the walk keeps the
//! number of grid lines already crossed plus the offset from the start point
//! to the first line. The next line on axis `a` lies at
//! `(crossings[a] + offset[a]) / |d[a]|`. Two axes are compared by cross
//! multiplication, and the walk only records the crossing; the ray parameter
//! is divided out once, for the face that is hit.
//!
//! # Example
//!
//! ```
//! use cf_hull::{Direction, HullManager, Ray, VoxelCoord};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut hull: HullManager<()> = HullManager::default();
//! hull.update(VoxelCoord::origin(), ()).unwrap();
//!
//! let ray = Ray::new(Point3::new(5.0, 0.5, 0.5), -Vector3::x());
//! let hit = hull.hit_test(&ray).unwrap();
//! assert_eq!(hit.coord, VoxelCoord::origin());
//! assert_eq!(hit.face, Direction::PosX);
//! ```

use nalgebra::{Point3, Vector3};

use crate::hull::HullManager;
use crate::indexer::{CellId, CubeIndexer};
use crate::voxel::{Axis, Direction, VoxelCoord};

/// A ray defined by an origin point and a direction vector.
///
/// The direction does not need to be normalized, but must be non-zero.
/// Cell `(x, y, z)` occupies the unit box `[x, x+1) × [y, y+1) × [z, z+1)`.
///
/// # Example
///
/// ```
/// use cf_hull::Ray;
/// use nalgebra::{Point3, Vector3};
///
/// let ray = Ray::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Vector3::new(1.0, 0.0, 0.0),
/// );
///
/// let point = ray.point_at(5.0);
/// assert!((point.x - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin of the ray.
    pub origin: Point3<f64>,
    /// The direction of the ray (not necessarily normalized).
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Creates a new ray with the given origin and direction.
    #[must_use]
    pub const fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    /// Returns the point along the ray at parameter `t`.
    ///
    /// The point is computed as `origin + t * direction`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Point3::origin(), Vector3::x())
    }
}

/// An exposed face struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullHit {
    /// The cell owning the face.
    pub coord: VoxelCoord,
    /// Orientation of the struck face (opposite to the ray's travel on the
    /// crossed axis).
    pub face: Direction,
    /// Ray parameter at which the face is struck.
    pub t: f64,
}

/// Casts `ray` against the exposed faces of `hull`.
///
/// Rays starting outside the cube are clipped to it first; the entry cell is
/// tested against its entry face before the walk begins. The walk stops when
/// it leaves the cube or after [`HullConfig::max_ray_steps`] steps.
///
/// Returns `None` for a zero or non-finite ray, a ray that misses the cube,
/// or a ray that strikes no exposed face.
///
/// [`HullConfig::max_ray_steps`]: crate::HullConfig::max_ray_steps
#[must_use]
pub fn hit_test<T>(hull: &HullManager<T>, ray: &Ray) -> Option<HullHit> {
    let indexer = *hull.indexer();
    let entry = Entry::find(ray, f64::from(indexer.radius()))?;
    let id = indexer.encode(entry.coord).ok()?;

    if let Some(face) = entry.face {
        if hull.contains_border_id(id, face) {
            return Some(HullHit {
                coord: entry.coord,
                face,
                t: entry.t,
            });
        }
    }

    HullWalk::new(ray, &entry, id, indexer)
        .take(hull.config().max_ray_steps)
        .find(|step| hull.contains_border_id(step.id, step.face))
        .map(|step| HullHit {
            coord: step.coord,
            face: step.face,
            t: step.t(entry.t),
        })
}

/// Where the walk starts: the ray origin, or the point where it enters the
/// cube.
#[derive(Debug, Clone, Copy)]
struct Entry {
    point: [f64; 3],
    coord: VoxelCoord,
    t: f64,
    // Face crossed when entering the cube from outside.
    face: Option<Direction>,
}

impl Entry {
    fn find(ray: &Ray, radius: f64) -> Option<Self> {
        let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
        let dir = [ray.direction.x, ray.direction.y, ray.direction.z];
        if origin.iter().chain(&dir).any(|v| !v.is_finite()) || dir.iter().all(|&d| d == 0.0) {
            return None;
        }

        let inside = origin.iter().all(|&p| p >= -radius && p < radius);
        if inside {
            return Some(Self {
                point: origin,
                coord: cell_of(origin, radius),
                t: 0.0,
                face: None,
            });
        }

        // Slab clip against [-radius, radius] on every axis.
        let mut t_enter = f64::NEG_INFINITY;
        let mut t_exit = f64::INFINITY;
        let mut entry_axis = None;
        for axis in Axis::ALL {
            let a = axis.index();
            let (p, d) = (origin[a], dir[a]);
            if d == 0.0 {
                if p < -radius || p >= radius {
                    return None;
                }
                continue;
            }
            let t0 = (-radius - p) / d;
            let t1 = (radius - p) / d;
            let (near, far) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
            if near > t_enter {
                t_enter = near;
                entry_axis = Some(axis);
            }
            t_exit = t_exit.min(far);
        }

        let axis = entry_axis?;
        let t_enter = t_enter.max(0.0);
        if t_enter >= t_exit {
            return None;
        }

        let a = axis.index();
        let mut point: [f64; 3] = std::array::from_fn(|i| origin[i] + dir[i] * t_enter);
        let face = if dir[a] > 0.0 {
            point[a] = -radius;
            axis.negative()
        } else {
            point[a] = radius;
            axis.positive()
        };

        Some(Self {
            point,
            coord: cell_of(point, radius),
            t: t_enter,
            face: Some(face),
        })
    }
}

#[allow(clippy::cast_possible_truncation)]
fn cell_of(point: [f64; 3], radius: f64) -> VoxelCoord {
    let cell = |v: f64| v.floor().clamp(-radius, radius - 1.0) as i32;
    VoxelCoord::new(cell(point[0]), cell(point[1]), cell(point[2]))
}

#[derive(Debug, Clone, Copy)]
struct WalkStep {
    coord: VoxelCoord,
    id: CellId,
    face: Direction,
    // Grid line crossed, in cells from the start point, and `|d|` on its axis.
    distance: f64,
    speed: f64,
}

impl WalkStep {
    /// Ray parameter of the crossed face.
    fn t(&self, t_start: f64) -> f64 {
        t_start + self.distance / self.speed
    }
}

/// Cell-by-cell walk along a ray, yielding each entered cell together with
/// the face crossed to enter it. Ends when the walk leaves the cube.
#[derive(Debug, Clone)]
struct HullWalk {
    indexer: CubeIndexer,
    coord: VoxelCoord,
    id: CellId,
    /// Travel direction per axis, `None` for axes the ray never crosses.
    travel: [Option<Direction>; 3],
    /// `|d|` per axis.
    speed: [f64; 3],
    /// Distance from the start point to the first grid line, in cells.
    offset: [f64; 3],
    crossings: [f64; 3],
}

impl HullWalk {
    fn new(ray: &Ray, entry: &Entry, id: CellId, indexer: CubeIndexer) -> Self {
        let dir = [ray.direction.x, ray.direction.y, ray.direction.z];
        let mut travel = [None; 3];
        let mut speed = [0.0; 3];
        let mut offset = [0.0; 3];

        for axis in Axis::ALL {
            let a = axis.index();
            let cell = f64::from(entry.coord.component(axis));
            if dir[a] > 0.0 {
                travel[a] = Some(axis.positive());
                offset[a] = (cell + 1.0 - entry.point[a]).clamp(0.0, 1.0);
            } else if dir[a] < 0.0 {
                travel[a] = Some(axis.negative());
                offset[a] = (entry.point[a] - cell).clamp(0.0, 1.0);
            } else {
                continue;
            }
            speed[a] = dir[a].abs();
        }

        Self {
            indexer,
            coord: entry.coord,
            id,
            travel,
            speed,
            offset,
            crossings: [0.0; 3],
        }
    }

    // Axis whose next grid line comes first; ties keep the lower axis.
    fn next_axis(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for a in 0..3 {
            if self.travel[a].is_none() {
                continue;
            }
            best = match best {
                Some(b)
                    if (self.crossings[a] + self.offset[a]) * self.speed[b]
                        >= (self.crossings[b] + self.offset[b]) * self.speed[a] =>
                {
                    Some(b)
                }
                _ => Some(a),
            };
        }
        best
    }
}

impl Iterator for HullWalk {
    type Item = WalkStep;

    fn next(&mut self) -> Option<Self::Item> {
        let a = self.next_axis()?;
        let travel = self.travel[a]?;

        let distance = self.crossings[a] + self.offset[a];
        self.crossings[a] += 1.0;
        self.coord = self.coord.step(travel);
        if !self.indexer.contains(self.coord) {
            self.travel = [None; 3];
            return None;
        }
        self.id = self.indexer.step(self.id, travel);

        Some(WalkStep {
            coord: self.coord,
            id: self.id,
            face: travel.opposite(),
            distance,
            speed: self.speed[a],
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::HullConfig;
    use approx::assert_relative_eq;

    fn hull_with(radius: i32, cells: &[(i32, i32, i32)]) -> HullManager<()> {
        let mut hull = HullManager::new(HullConfig::default().with_radius(radius)).unwrap();
        for &cell in cells {
            hull.update(cell.into(), ()).unwrap();
        }
        hull
    }

    #[test]
    fn test_ray_point_at() {
        let ray = Ray::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(2.0, 0.0, -1.0));
        let p = ray.point_at(1.5);
        assert_relative_eq!(p.x, 4.0);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(p.z, 1.5);
    }

    #[test]
    fn test_walk_steps_defer_ray_parameter() {
        let ray = Ray::new(Point3::new(0.5, 0.5, 0.5), Vector3::new(1.0, 0.5, 0.0));
        let entry = Entry::find(&ray, 16.0).unwrap();
        let indexer = CubeIndexer::new(16).unwrap();
        let id = indexer.encode(entry.coord).unwrap();

        let steps: Vec<WalkStep> = HullWalk::new(&ray, &entry, id, indexer).take(3).collect();
        let cells: Vec<VoxelCoord> = steps.iter().map(|s| s.coord).collect();
        assert_eq!(
            cells,
            vec![
                VoxelCoord::new(1, 0, 0),
                VoxelCoord::new(1, 1, 0),
                VoxelCoord::new(2, 1, 0),
            ]
        );
        assert_eq!(steps[1].face, Direction::NegY);
        assert_relative_eq!(steps[0].t(entry.t), 0.5);
        assert_relative_eq!(steps[1].t(entry.t), 1.0);
        assert_relative_eq!(steps[2].t(entry.t), 1.5);
        assert_relative_eq!(steps[2].t(2.0), 3.5);
    }

    #[test]
    fn test_hit_single_cell_from_positive_x() {
        let hull = hull_with(800, &[(0, 0, 0)]);
        let ray = Ray::new(Point3::new(5.0, 0.5, 0.5), -Vector3::x());
        let hit = hit_test(&hull, &ray).unwrap();
        assert_eq!(hit.coord, VoxelCoord::origin());
        assert_eq!(hit.face, Direction::PosX);
        assert_relative_eq!(hit.t, 4.0);
        assert_relative_eq!(ray.point_at(hit.t).x, 1.0);
    }

    #[test]
    fn test_hit_first_exposed_face() {
        let hull = hull_with(16, &[(0, 0, 0), (1, 0, 0)]);
        let ray = Ray::new(Point3::new(5.0, 0.5, 0.5), -Vector3::x());
        let hit = hit_test(&hull, &ray).unwrap();
        assert_eq!(hit.coord, VoxelCoord::new(1, 0, 0));
        assert_relative_eq!(hit.t, 3.0);
    }

    #[test]
    fn test_hit_diagonal() {
        let hull = hull_with(16, &[(0, 0, 0)]);
        let ray = Ray::new(Point3::new(3.5, 3.25, 0.5), Vector3::new(-1.0, -1.0, 0.0));
        let hit = hit_test(&hull, &ray).unwrap();
        assert_eq!(hit.coord, VoxelCoord::origin());
        assert_eq!(hit.face, Direction::PosX);
        assert_relative_eq!(hit.t, 2.5);
    }

    #[test]
    fn test_hit_from_below() {
        let hull = hull_with(16, &[(2, -3, 4)]);
        let ray = Ray::new(Point3::new(2.5, -2.5, -6.0), Vector3::new(0.0, 0.0, 2.0));
        let hit = hit_test(&hull, &ray).unwrap();
        assert_eq!(hit.coord, VoxelCoord::new(2, -3, 4));
        assert_eq!(hit.face, Direction::NegZ);
        assert_relative_eq!(hit.t, 5.0);
    }

    #[test]
    fn test_origin_outside_cube_is_clipped() {
        let hull = hull_with(16, &[(-16, 0, 0)]);
        let ray = Ray::new(Point3::new(-100.0, 0.5, 0.5), Vector3::x());
        let hit = hit_test(&hull, &ray).unwrap();
        assert_eq!(hit.coord, VoxelCoord::new(-16, 0, 0));
        assert_eq!(hit.face, Direction::NegX);
        assert_relative_eq!(hit.t, 84.0);
    }

    #[test]
    fn test_clipped_ray_walks_inward() {
        let hull = hull_with(16, &[(3, 0, 0)]);
        let ray = Ray::new(Point3::new(40.0, 0.5, 0.5), -Vector3::x());
        let hit = hit_test(&hull, &ray).unwrap();
        assert_eq!(hit.coord, VoxelCoord::new(3, 0, 0));
        assert_eq!(hit.face, Direction::PosX);
        assert_relative_eq!(hit.t, 36.0);
    }

    #[test]
    fn test_miss_cube() {
        let hull = hull_with(16, &[(0, 0, 0)]);
        let away = Ray::new(Point3::new(100.0, 0.5, 0.5), Vector3::x());
        assert!(hit_test(&hull, &away).is_none());
        let parallel = Ray::new(Point3::new(100.0, 40.0, 0.5), -Vector3::x());
        assert!(hit_test(&hull, &parallel).is_none());
    }

    #[test]
    fn test_degenerate_rays() {
        let hull = hull_with(16, &[(0, 0, 0)]);
        let zero = Ray::new(Point3::new(5.0, 0.5, 0.5), Vector3::zeros());
        assert!(hit_test(&hull, &zero).is_none());
        let nan = Ray::new(Point3::new(f64::NAN, 0.5, 0.5), -Vector3::x());
        assert!(hit_test(&hull, &nan).is_none());
    }

    #[test]
    fn test_no_hit_on_hidden_faces() {
        // Starting inside a row of cells, the ray never enters through an
        // exposed face.
        let hull = hull_with(16, &[(0, 0, 0), (1, 0, 0), (2, 0, 0)]);
        let ray = Ray::new(Point3::new(0.5, 0.5, 0.5), Vector3::x());
        assert!(hit_test(&hull, &ray).is_none());
    }

    #[test]
    fn test_step_limit() {
        let mut hull = HullManager::new(
            HullConfig::default()
                .with_radius(16)
                .with_max_ray_steps(3),
        )
        .unwrap();
        hull.update(VoxelCoord::origin(), ()).unwrap();
        let ray = Ray::new(Point3::new(5.0, 0.5, 0.5), -Vector3::x());
        assert!(hit_test(&hull, &ray).is_none());
        let near = Ray::new(Point3::new(2.5, 0.5, 0.5), -Vector3::x());
        assert!(hit_test(&hull, &near).is_some());
    }
}
