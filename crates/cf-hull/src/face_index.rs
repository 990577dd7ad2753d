//! Hull faces bucketed by orientation, plane and tile.
//!
//! A [`FaceIndex`] keeps the faces a mesh builder renders, grouped as
//! orientation → plane → tile → in-plane position. Every edit marks the
//! affected tile dirty so the builder can rebuild tiles lazily, a bounded
//! number per tick.
//!
//! Tiles are `tile_size` cells wide. An in-plane position `p` belongs to tile
//! `floor((p + tile_offset) / tile_size)`, so with the defaults (13 and 6) the
//! origin sits in the middle of tile `(0, 0)`.
//!
//! # Example
//!
//! ```
//! use cf_hull::{Direction, FaceIndex, FaceIndexConfig, HullManager, TileId, VoxelCoord};
//!
//! let mut hull: HullManager<u8> = HullManager::default();
//! hull.update(VoxelCoord::new(0, 0, 0), 1).unwrap();
//!
//! let mut index = FaceIndex::new(FaceIndexConfig::default()).unwrap();
//! let summary = index.sync(&mut hull);
//! assert_eq!(summary.added, 6);
//! assert_eq!(index.face(Direction::PosZ, VoxelCoord::new(0, 0, 0)), Some(&1));
//!
//! let dirty = index.take_invalid_tiles(Direction::PosZ, 8);
//! assert_eq!(dirty.len(), 1);
//! assert_eq!(dirty[0].tile, TileId::new(0, 0));
//! ```

use hashbrown::HashMap;
use tracing::warn;

use crate::config::{FaceIndexConfig, IndexView};
use crate::error::HullResult;
use crate::hull::HullManager;
use crate::voxel::{Axis, Direction, VoxelCoord};

/// Read access to hull border membership.
pub trait BorderQuery {
    /// Returns `true` if the face of `coord` in `direction` is on the hull.
    fn contains_border(&self, coord: VoxelCoord, direction: Direction) -> bool;
}

/// A tile within a plane, in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileId {
    /// First in-plane tile coordinate.
    pub u: i32,
    /// Second in-plane tile coordinate.
    pub v: i32,
}

impl TileId {
    /// Creates a tile id.
    #[must_use]
    pub const fn new(u: i32, v: i32) -> Self {
        Self { u, v }
    }
}

/// How much of a dirty tile must be rebuilt.
///
/// Ordered so that [`Refresh::Full`] dominates: once a tile is marked full it
/// stays full until drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Refresh {
    /// Only seams toward a changed neighbor tile need work.
    Incremental,
    /// The tile's own faces changed.
    Full,
}

/// A drained dirty tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyTile {
    /// Plane coordinate along the orientation's axis.
    pub plane: i32,
    /// Tile within the plane.
    pub tile: TileId,
    /// Rebuild scope.
    pub refresh: Refresh,
}

/// Counts reported by [`FaceIndex::sync`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Faces added or refreshed.
    pub added: usize,
    /// Faces removed.
    pub removed: usize,
    /// Removals for faces the index never held.
    pub missing: usize,
}

type Tile<T> = HashMap<(i32, i32), T>;
type Planes<T> = HashMap<i32, HashMap<TileId, Tile<T>>>;
type DirtyPlanes = HashMap<i32, HashMap<TileId, Refresh>>;

/// Hull faces bucketed for incremental mesh rebuilds.
#[derive(Debug, Clone)]
pub struct FaceIndex<T> {
    config: FaceIndexConfig,
    faces: [Planes<T>; 6],
    dirty: [DirtyPlanes; 6],
    len: usize,
}

impl<T> Default for FaceIndex<T> {
    fn default() -> Self {
        Self::with_config(FaceIndexConfig::default())
    }
}

impl<T> FaceIndex<T> {
    /// Creates an empty index.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::InvalidTileSize`](crate::HullError::InvalidTileSize)
    /// if the tile size is not positive.
    pub fn new(config: FaceIndexConfig) -> HullResult<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: FaceIndexConfig) -> Self {
        Self {
            config,
            faces: Default::default(),
            dirty: Default::default(),
            len: 0,
        }
    }

    /// The configuration this index was built with.
    #[must_use]
    pub const fn config(&self) -> &FaceIndexConfig {
        &self.config
    }

    /// Tile holding the in-plane position `(u, v)`.
    #[must_use]
    pub fn tile_of(&self, (u, v): (i32, i32)) -> TileId {
        let FaceIndexConfig {
            tile_size,
            tile_offset,
            ..
        } = self.config;
        TileId::new(
            u.wrapping_add(tile_offset).div_euclid(tile_size),
            v.wrapping_add(tile_offset).div_euclid(tile_size),
        )
    }

    /// Stores the face of `coord` in `direction`.
    ///
    /// Returns `true` if no face was overwritten. Faces in orientations the
    /// view does not track are ignored and return `false`.
    pub fn add_face<B>(
        &mut self,
        borders: &B,
        direction: Direction,
        coord: VoxelCoord,
        payload: T,
    ) -> bool
    where
        B: BorderQuery + ?Sized,
    {
        if !self.config.view.accepts(direction) {
            return false;
        }
        let (plane, pos) = project(direction, coord);
        let tile = self.tile_of(pos);
        let fresh = self.faces[direction.index()]
            .entry(plane)
            .or_default()
            .entry(tile)
            .or_default()
            .insert(pos, payload)
            .is_none();
        if fresh {
            self.len += 1;
        }
        self.invalidate_around(borders, direction, plane, pos, tile);
        fresh
    }

    /// Removes the face of `coord` in `direction` and returns its payload.
    ///
    /// Empty tiles and planes are dropped.
    pub fn remove_face<B>(
        &mut self,
        borders: &B,
        direction: Direction,
        coord: VoxelCoord,
    ) -> Option<T>
    where
        B: BorderQuery + ?Sized,
    {
        if !self.config.view.accepts(direction) {
            return None;
        }
        let (plane, pos) = project(direction, coord);
        let tile = self.tile_of(pos);

        let planes = &mut self.faces[direction.index()];
        let tiles = planes.get_mut(&plane)?;
        let faces = tiles.get_mut(&tile)?;
        let payload = faces.remove(&pos)?;
        if faces.is_empty() {
            tiles.remove(&tile);
            if tiles.is_empty() {
                planes.remove(&plane);
            }
        }

        self.len -= 1;
        self.invalidate_around(borders, direction, plane, pos, tile);
        Some(payload)
    }

    /// Payload of the face of `coord` in `direction`.
    #[must_use]
    pub fn face(&self, direction: Direction, coord: VoxelCoord) -> Option<&T> {
        let (plane, pos) = project(direction, coord);
        self.faces[direction.index()]
            .get(&plane)?
            .get(&self.tile_of(pos))?
            .get(&pos)
    }

    /// Faces stored in one tile.
    pub fn faces(
        &self,
        direction: Direction,
        plane: i32,
        tile: TileId,
    ) -> impl Iterator<Item = (VoxelCoord, &T)> + '_ {
        self.faces[direction.index()]
            .get(&plane)
            .and_then(|tiles| tiles.get(&tile))
            .into_iter()
            .flatten()
            .map(move |(&pos, payload)| (unproject(direction, plane, pos), payload))
    }

    /// Number of stored faces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no face is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every face and dirty tile.
    pub fn clear(&mut self) {
        for planes in &mut self.faces {
            planes.clear();
        }
        for planes in &mut self.dirty {
            planes.clear();
        }
        self.len = 0;
    }

    /// Marks a tile dirty. A [`Refresh::Full`] mark is never downgraded.
    pub fn invalidate(&mut self, direction: Direction, plane: i32, tile: TileId, refresh: Refresh) {
        let mark = self.dirty[direction.index()]
            .entry(plane)
            .or_default()
            .entry(tile)
            .or_insert(refresh);
        *mark = (*mark).max(refresh);
    }

    /// Dirty mark of a tile, if any.
    #[must_use]
    pub fn is_invalid(&self, direction: Direction, plane: i32, tile: TileId) -> Option<Refresh> {
        self.dirty[direction.index()].get(&plane)?.get(&tile).copied()
    }

    /// All dirty tiles of `direction`, keyed by plane.
    #[must_use]
    pub fn invalid_planes(&self, direction: Direction) -> &HashMap<i32, HashMap<TileId, Refresh>> {
        &self.dirty[direction.index()]
    }

    /// Forgets every dirty tile of `direction`.
    pub fn clear_invalid_areas(&mut self, direction: Direction) {
        self.dirty[direction.index()].clear();
    }

    /// Drains at most `budget` dirty tiles of `direction`, lowest plane and
    /// tile first. The rest stay queued for the next call.
    pub fn take_invalid_tiles(&mut self, direction: Direction, budget: usize) -> Vec<DirtyTile> {
        let planes = &mut self.dirty[direction.index()];
        let mut plane_keys: Vec<i32> = planes.keys().copied().collect();
        plane_keys.sort_unstable();

        let mut taken = Vec::new();
        for plane in plane_keys {
            if taken.len() >= budget {
                break;
            }
            let Some(tiles) = planes.get_mut(&plane) else {
                continue;
            };
            let mut tile_keys: Vec<TileId> = tiles.keys().copied().collect();
            tile_keys.sort_unstable();
            for tile in tile_keys.into_iter().take(budget - taken.len()) {
                if let Some(refresh) = tiles.remove(&tile) {
                    taken.push(DirtyTile {
                        plane,
                        tile,
                        refresh,
                    });
                }
            }
            if tiles.is_empty() {
                planes.remove(&plane);
            }
        }
        taken
    }

    // The edited tile needs a full rebuild. In the perspective view,
    // neighboring tiles holding a face that touches the edited one need
    // their seams redone.
    fn invalidate_around<B>(
        &mut self,
        borders: &B,
        direction: Direction,
        plane: i32,
        (u, v): (i32, i32),
        tile: TileId,
    ) where
        B: BorderQuery + ?Sized,
    {
        self.invalidate(direction, plane, tile, Refresh::Full);
        if self.config.view != IndexView::Perspective {
            return;
        }
        for du in -1..=1 {
            for dv in -1..=1 {
                let pos = (u.wrapping_add(du), v.wrapping_add(dv));
                let neighbor = self.tile_of(pos);
                if neighbor != tile
                    && borders.contains_border(unproject(direction, plane, pos), direction)
                {
                    self.invalidate(direction, plane, neighbor, Refresh::Incremental);
                }
            }
        }
    }
}

impl<T: Clone + PartialEq> FaceIndex<T> {
    /// Drains the pending diffs of `hull` for every tracked orientation and
    /// applies them: removals first, then additions as upserts.
    pub fn sync(&mut self, hull: &mut HullManager<T>) -> SyncSummary {
        let mut summary = SyncSummary::default();
        for direction in Direction::ALL {
            if !self.config.view.accepts(direction) {
                continue;
            }
            let removals = hull.take_hull_removals(direction);
            let additions = hull.take_hull_additions(direction);

            for change in removals {
                if self.remove_face(&*hull, direction, change.coord).is_some() {
                    summary.removed += 1;
                } else {
                    warn!(
                        "Removal of unknown {:?} face at {:?}",
                        direction, change.coord
                    );
                    summary.missing += 1;
                }
            }
            for change in additions {
                self.add_face(&*hull, direction, change.coord, change.payload);
                summary.added += 1;
            }
        }
        summary
    }
}

/// Splits a face coordinate into its plane and in-plane position.
fn project(direction: Direction, coord: VoxelCoord) -> (i32, (i32, i32)) {
    match direction.axis() {
        Axis::X => (coord.x, (coord.y, coord.z)),
        Axis::Y => (coord.y, (coord.x, coord.z)),
        Axis::Z => (coord.z, (coord.x, coord.y)),
    }
}

fn unproject(direction: Direction, plane: i32, (u, v): (i32, i32)) -> VoxelCoord {
    match direction.axis() {
        Axis::X => VoxelCoord::new(plane, u, v),
        Axis::Y => VoxelCoord::new(u, plane, v),
        Axis::Z => VoxelCoord::new(u, v, plane),
    }
}
