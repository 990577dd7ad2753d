//! Per-direction pending hull diffs.
//!
//! A [`DiffBuffer`] records the net border-membership changes of one face
//! direction between two drains. Opposite transitions of the same id cancel,
//! so a consumer that applies every drained removal and addition never sees a
//! removal for a face it was not told about.

use hashbrown::{HashMap, HashSet};

use crate::indexer::CellId;
use crate::voxel::VoxelCoord;

/// A drained hull face change: the cell and its payload.
///
/// For additions the payload is the latest value stored in the cell. For
/// removals it is the last payload the cell carried while its face was
/// exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceChange<T> {
    /// Cell owning the face.
    pub coord: VoxelCoord,
    /// Payload attached to the face.
    pub payload: T,
}

#[derive(Debug, Clone)]
struct Removal<T> {
    payload: T,
    // The consumer holds an older payload than `payload`.
    stale: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct DiffBuffer<T> {
    added: HashMap<CellId, T>,
    // Additions the consumer has never seen. Only these cancel against a
    // later removal.
    fresh: HashSet<CellId>,
    removed: HashMap<CellId, Removal<T>>,
}

impl<T> Default for DiffBuffer<T> {
    fn default() -> Self {
        Self {
            added: HashMap::new(),
            fresh: HashSet::new(),
            removed: HashMap::new(),
        }
    }
}

impl<T: Clone + PartialEq> DiffBuffer<T> {
    /// `id` became a border member.
    pub(crate) fn gain(&mut self, id: CellId, payload: &T) {
        match self.removed.remove(&id) {
            Some(removal) => {
                if removal.stale || removal.payload != *payload {
                    self.added.insert(id, payload.clone());
                }
            }
            None => {
                self.added.insert(id, payload.clone());
                self.fresh.insert(id);
            }
        }
    }

    /// `id` stopped being a border member. `payload` is its last value.
    pub(crate) fn lose(&mut self, id: CellId, payload: &T) {
        if self.fresh.remove(&id) {
            self.added.remove(&id);
            return;
        }
        let stale = self.added.remove(&id).is_some();
        self.removed.insert(
            id,
            Removal {
                payload: payload.clone(),
                stale,
            },
        );
    }

    /// The payload of `id` was replaced without a geometry change.
    pub(crate) fn refresh(&mut self, id: CellId, payload: &T, is_member: bool) {
        if is_member {
            self.added.insert(id, payload.clone());
        } else if let Some(removal) = self.removed.get_mut(&id) {
            if removal.payload != *payload {
                removal.payload = payload.clone();
                removal.stale = true;
            }
        }
    }
}

impl<T> DiffBuffer<T> {
    pub(crate) fn take_additions(&mut self) -> Vec<(CellId, T)> {
        self.fresh.clear();
        self.added.drain().collect()
    }

    pub(crate) fn take_removals(&mut self) -> Vec<(CellId, T)> {
        self.removed
            .drain()
            .map(|(id, removal)| (id, removal.payload))
            .collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.added.clear();
        self.fresh.clear();
        self.removed.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::indexer::CubeIndexer;

    fn id(x: i32) -> CellId {
        CubeIndexer::new(8)
            .unwrap()
            .encode(VoxelCoord::new(x, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_gain_then_lose_cancels() {
        let mut diff = DiffBuffer::default();
        diff.gain(id(1), &'a');
        diff.lose(id(1), &'a');
        assert!(diff.is_empty());
    }

    #[test]
    fn test_lose_then_gain_same_payload_cancels() {
        let mut diff = DiffBuffer::default();
        diff.lose(id(1), &'a');
        diff.gain(id(1), &'a');
        assert!(diff.is_empty());
    }

    #[test]
    fn test_lose_then_gain_new_payload_is_upsert() {
        let mut diff = DiffBuffer::default();
        diff.lose(id(1), &'a');
        diff.gain(id(1), &'b');
        assert!(diff.take_removals().is_empty());
        assert_eq!(diff.take_additions(), vec![(id(1), 'b')]);
    }

    #[test]
    fn test_refresh_then_lose_then_gain_reports_upsert() {
        // Consumer knows 'a'; recolor to 'b' is cancelled by the removal but
        // must resurface when the face returns.
        let mut diff = DiffBuffer::default();
        diff.refresh(id(2), &'b', true);
        diff.lose(id(2), &'b');
        assert_eq!(diff.added.len(), 0);
        diff.gain(id(2), &'b');
        assert_eq!(diff.take_additions(), vec![(id(2), 'b')]);
        assert!(diff.take_removals().is_empty());
    }

    #[test]
    fn test_refresh_pending_removal() {
        let mut diff = DiffBuffer::default();
        diff.lose(id(3), &'a');
        diff.refresh(id(3), &'c', false);
        assert_eq!(diff.take_removals(), vec![(id(3), 'c')]);
    }

    #[test]
    fn test_drained_addition_is_not_fresh() {
        let mut diff = DiffBuffer::default();
        diff.gain(id(4), &'a');
        assert_eq!(diff.take_additions().len(), 1);
        diff.lose(id(4), &'a');
        assert_eq!(diff.take_removals(), vec![(id(4), 'a')]);
    }
}
