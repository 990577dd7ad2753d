//! Incremental hull tracking.
//!
//! A [`HullManager`] owns a sparse set of occupied cells and, for each of the
//! six face directions, the border set: the occupied cells whose neighbor in
//! that direction is empty (or outside the cube). Every mutation updates the
//! border sets in place by inspecting the six neighbors of the edited cell,
//! and records the net change in a per-direction diff that a consumer drains
//! with [`HullManager::take_hull_additions`] and
//! [`HullManager::take_hull_removals`].
//!
//! # Example
//!
//! ```
//! use cf_hull::{Direction, HullManager, VoxelCoord};
//!
//! let mut hull: HullManager<u32> = HullManager::default();
//! hull.update(VoxelCoord::new(0, 0, 0), 7).unwrap();
//! hull.update(VoxelCoord::new(1, 0, 0), 7).unwrap();
//!
//! // The shared face between the two cells is hidden.
//! assert!(!hull.contains_border(VoxelCoord::new(0, 0, 0), Direction::PosX));
//! assert!(hull.contains_border(VoxelCoord::new(1, 0, 0), Direction::PosX));
//!
//! let added = hull.take_hull_additions(Direction::PosX);
//! assert_eq!(added.len(), 1);
//! assert_eq!(added[0].coord, VoxelCoord::new(1, 0, 0));
//! ```

use hashbrown::{HashMap, HashSet};
use tracing::debug;

use crate::bounds::GridBounds;
use crate::config::HullConfig;
use crate::diff::{DiffBuffer, FaceChange};
use crate::error::HullResult;
use crate::exterior::ExteriorClassification;
use crate::face_index::BorderQuery;
use crate::indexer::{CellId, CubeIndexer};
use crate::raycast::{self, HullHit, Ray};
use crate::voxel::{Direction, VoxelCoord};

/// Occupied cells, their exposed faces and the pending face diffs.
///
/// Payloads are stored by value. A payload replacement on an occupied cell
/// leaves the geometry alone but re-reports every exposed face of the cell so
/// consumers pick up the new value.
#[derive(Debug, Clone)]
pub struct HullManager<T> {
    config: HullConfig,
    indexer: CubeIndexer,
    cells: HashMap<CellId, T>,
    border: [HashSet<CellId>; 6],
    diffs: [DiffBuffer<T>; 6],
}

impl<T> Default for HullManager<T> {
    fn default() -> Self {
        Self::with_indexer(HullConfig::default(), CubeIndexer::default())
    }
}

impl<T> HullManager<T> {
    /// Creates an empty hull manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(config: HullConfig) -> HullResult<Self> {
        config.validate()?;
        let indexer = CubeIndexer::new(config.radius)?;
        Ok(Self::with_indexer(config, indexer))
    }

    fn with_indexer(config: HullConfig, indexer: CubeIndexer) -> Self {
        Self {
            config,
            indexer,
            cells: HashMap::new(),
            border: Default::default(),
            diffs: Default::default(),
        }
    }

    /// The configuration this manager was built with.
    #[must_use]
    pub const fn config(&self) -> &HullConfig {
        &self.config
    }

    /// The indexer mapping coordinates to cell ids.
    #[must_use]
    pub const fn indexer(&self) -> &CubeIndexer {
        &self.indexer
    }

    /// Removes every cell, border face and pending diff.
    ///
    /// Consumers holding faces from earlier drains must rebuild from scratch.
    pub fn clear(&mut self) {
        debug!("Clearing hull with {} cells", self.cells.len());
        self.cells.clear();
        for set in &mut self.border {
            set.clear();
        }
        for diff in &mut self.diffs {
            diff.clear();
        }
    }

    /// Returns `true` if `coord` is occupied. Out-of-range coordinates are
    /// never occupied.
    #[must_use]
    pub fn contains(&self, coord: VoxelCoord) -> bool {
        self.indexer
            .encode(coord)
            .is_ok_and(|id| self.cells.contains_key(&id))
    }

    /// Returns `true` if the cell with this id is occupied.
    #[must_use]
    pub fn contains_id(&self, id: CellId) -> bool {
        self.cells.contains_key(&id)
    }

    /// Returns `true` if the face of `coord` in `direction` is on the hull.
    #[must_use]
    pub fn contains_border(&self, coord: VoxelCoord, direction: Direction) -> bool {
        self.indexer
            .encode(coord)
            .is_ok_and(|id| self.contains_border_id(id, direction))
    }

    /// Returns `true` if the face of cell `id` in `direction` is on the hull.
    #[must_use]
    pub fn contains_border_id(&self, id: CellId, direction: Direction) -> bool {
        self.border[direction.index()].contains(&id)
    }

    /// Payload stored at `coord`.
    #[must_use]
    pub fn get(&self, coord: VoxelCoord) -> Option<&T> {
        let id = self.indexer.encode(coord).ok()?;
        self.cells.get(&id)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over the occupied coordinates in no particular order.
    pub fn positions(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        self.cells.keys().map(|&id| self.indexer.decode(id))
    }

    /// Current border cells for `direction`.
    ///
    /// This is the full hull, not a diff, and does not touch pending state.
    #[must_use]
    pub fn hull(&self, direction: Direction) -> Vec<VoxelCoord> {
        self.border[direction.index()]
            .iter()
            .map(|&id| self.indexer.decode(id))
            .collect()
    }

    /// Current border set for `direction`, keyed by cell id.
    #[must_use]
    pub fn hull_ids(&self, direction: Direction) -> &HashSet<CellId> {
        &self.border[direction.index()]
    }

    /// Cells with at least one exposed face.
    #[must_use]
    pub fn visible_cells(&self) -> HashSet<VoxelCoord> {
        self.border
            .iter()
            .flatten()
            .map(|&id| self.indexer.decode(id))
            .collect()
    }

    /// Bounds of the occupied cells, or `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<GridBounds> {
        let mut positions = self.positions();
        let first = positions.next()?;
        let mut bounds = GridBounds::from_point(first);
        for coord in positions {
            bounds.expand_to_include(coord);
        }
        Some(bounds)
    }

    /// Returns `true` if additions or removals are waiting in `direction`.
    #[must_use]
    pub fn has_pending_changes(&self, direction: Direction) -> bool {
        !self.diffs[direction.index()].is_empty()
    }

    /// Drains the net face additions of `direction` since the last drain.
    ///
    /// Each entry carries the latest payload of its cell. An entry may also
    /// refresh a face the consumer already holds; apply additions as upserts.
    pub fn take_hull_additions(&mut self, direction: Direction) -> Vec<FaceChange<T>> {
        let indexer = self.indexer;
        self.diffs[direction.index()]
            .take_additions()
            .into_iter()
            .map(|(id, payload)| FaceChange {
                coord: indexer.decode(id),
                payload,
            })
            .collect()
    }

    /// Drains the net face removals of `direction` since the last drain.
    pub fn take_hull_removals(&mut self, direction: Direction) -> Vec<FaceChange<T>> {
        let indexer = self.indexer;
        self.diffs[direction.index()]
            .take_removals()
            .into_iter()
            .map(|(id, payload)| FaceChange {
                coord: indexer.decode(id),
                payload,
            })
            .collect()
    }

    /// Casts `ray` against the exposed faces of this hull.
    #[must_use]
    pub fn hit_test(&self, ray: &Ray) -> Option<HullHit> {
        raycast::hit_test(self, ray)
    }

    /// Splits the current hull into sheets and classifies them.
    #[must_use]
    pub fn compute_exterior(&self) -> ExteriorClassification {
        ExteriorClassification::compute(self)
    }
}

impl<T: Clone + PartialEq> HullManager<T> {
    /// Stores `payload` at `coord` and returns the replaced payload.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::OutOfBounds`](crate::HullError::OutOfBounds) if
    /// `coord` lies outside the cube. The manager is left unchanged.
    pub fn update(&mut self, coord: VoxelCoord, payload: T) -> HullResult<Option<T>> {
        let id = self.indexer.encode(coord)?;

        if let Some(slot) = self.cells.get_mut(&id) {
            let previous = std::mem::replace(slot, payload);
            for direction in Direction::ALL {
                let d = direction.index();
                self.diffs[d].refresh(id, slot, self.border[d].contains(&id));
            }
            return Ok(Some(previous));
        }

        for direction in Direction::ALL {
            let neighbor = self.indexer.step(id, direction);
            if let Some(neighbor_payload) = self.cells.get(&neighbor) {
                // The neighbor's face toward us is now covered.
                let facing = direction.opposite().index();
                if self.border[facing].remove(&neighbor) {
                    self.diffs[facing].lose(neighbor, neighbor_payload);
                }
            } else {
                let d = direction.index();
                self.border[d].insert(id);
                self.diffs[d].gain(id, &payload);
            }
        }
        self.cells.insert(id, payload);

        Ok(None)
    }

    /// Empties the cell at `coord` and returns its payload.
    ///
    /// Returns `Ok(None)` without touching any diff if the cell was empty.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::OutOfBounds`](crate::HullError::OutOfBounds) if
    /// `coord` lies outside the cube.
    pub fn clear_position(&mut self, coord: VoxelCoord) -> HullResult<Option<T>> {
        let id = self.indexer.encode(coord)?;
        let Some(payload) = self.cells.remove(&id) else {
            return Ok(None);
        };

        for direction in Direction::ALL {
            let neighbor = self.indexer.step(id, direction);
            if let Some(neighbor_payload) = self.cells.get(&neighbor) {
                // The neighbor's face toward us is exposed again.
                let facing = direction.opposite().index();
                if self.border[facing].insert(neighbor) {
                    self.diffs[facing].gain(neighbor, neighbor_payload);
                }
            } else {
                let d = direction.index();
                if self.border[d].remove(&id) {
                    self.diffs[d].lose(id, &payload);
                }
            }
        }

        Ok(Some(payload))
    }
}

impl<T> BorderQuery for HullManager<T> {
    fn contains_border(&self, coord: VoxelCoord, direction: Direction) -> bool {
        Self::contains_border(self, coord, direction)
    }
}
