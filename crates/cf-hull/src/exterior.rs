//! Exterior/interior classification of hull sheets.
//!
//! The exposed faces of a hull form closed surfaces. Two faces are adjacent
//! when they share an edge on the surface: a face folds around a concave
//! corner into the diagonal cell, continues flat into the neighboring cell,
//! or folds around a convex corner onto the same cell, whichever comes first.
//! A flood fill over this adjacency splits the hull into sheets.
//!
//! Each sheet is then classified. A sheet is interior (a cavity wall) when
//! the lowest X reached by its `+X` faces is smaller than the lowest X
//! reached by its `-X` faces: a cavity wall faces inward, so its `+X` faces
//! sit on the low side. This is a heuristic; it is exact for the outer skin
//! of a solid and for simple cavities, but makes no claim for arbitrary
//! topologies. A second pass moves exterior sheets that lie inside a cavity
//! (solids floating in a hole) to the interior.
//!
//! # Example
//!
//! ```
//! use cf_hull::{Direction, HullManager, VoxelCoord};
//!
//! let mut hull: HullManager<()> = HullManager::default();
//! for x in 0..3 {
//!     for y in 0..3 {
//!         for z in 0..3 {
//!             if (x, y, z) != (1, 1, 1) {
//!                 hull.update(VoxelCoord::new(x, y, z), ()).unwrap();
//!             }
//!         }
//!     }
//! }
//!
//! let classification = hull.compute_exterior();
//! assert!(classification.has_interior());
//! assert_eq!(classification.exterior_hull(Direction::PosX).len(), 9);
//! assert_eq!(classification.interior_hull(Direction::PosX).len(), 1);
//! ```

use hashbrown::{HashMap, HashSet};
use tracing::{info, warn};

use crate::hull::HullManager;
use crate::indexer::{CellId, CubeIndexer};
use crate::voxel::{Direction, VoxelCoord};

type Face = (Direction, CellId);

/// A connected set of hull faces.
#[derive(Debug, Clone, Default)]
struct Sheet {
    faces: Vec<Face>,
    min_pos_x: Option<i32>,
    min_neg_x: Option<i32>,
    // First +X face reached, used to probe containment.
    probe: Option<VoxelCoord>,
}

impl Sheet {
    fn push(&mut self, indexer: &CubeIndexer, face: Face) {
        let (direction, id) = face;
        self.faces.push(face);
        match direction {
            Direction::PosX => {
                let coord = indexer.decode(id);
                self.min_pos_x = Some(self.min_pos_x.map_or(coord.x, |x| x.min(coord.x)));
                if self.probe.is_none() {
                    self.probe = Some(coord);
                }
            }
            Direction::NegX => {
                let x = indexer.decode(id).x;
                self.min_neg_x = Some(self.min_neg_x.map_or(x, |m| m.min(x)));
            }
            _ => {}
        }
    }

    fn faces_inward(&self) -> bool {
        match (self.min_pos_x, self.min_neg_x) {
            (Some(pos), Some(neg)) => pos < neg,
            _ => false,
        }
    }

    /// Returns `true` if `point` lies strictly inside one of the X spans this
    /// cavity wall encloses on the line through `point`.
    fn encloses(&self, indexer: &CubeIndexer, point: VoxelCoord) -> bool {
        // Planes of the wall on this line: +X faces open a span at x + 1,
        // -X faces close it at x.
        let mut planes: Vec<(i32, bool)> = self
            .faces
            .iter()
            .filter(|(direction, _)| matches!(direction, Direction::PosX | Direction::NegX))
            .filter_map(|&(direction, id)| {
                let coord = indexer.decode(id);
                (coord.y == point.y && coord.z == point.z).then(|| {
                    if direction == Direction::PosX {
                        (coord.x + 1, true)
                    } else {
                        (coord.x, false)
                    }
                })
            })
            .collect();
        planes.sort_unstable();

        // The probe face of the tested sheet sits on plane point.x + 1.
        let plane = point.x + 1;
        planes
            .windows(2)
            .any(|w| w[0].1 && !w[1].1 && w[0].0 < plane && plane < w[1].0)
    }
}

/// A snapshot partition of a hull into exterior and interior faces.
///
/// The classification does not track later edits; compute a new one after
/// mutating the hull.
#[derive(Debug, Clone)]
pub struct ExteriorClassification {
    indexer: CubeIndexer,
    exterior: [HashSet<CellId>; 6],
    interior: [HashSet<CellId>; 6],
    sheets: usize,
    interior_sheets: usize,
}

impl ExteriorClassification {
    /// Splits the current hull of `hull` into sheets and classifies them.
    #[must_use]
    pub fn compute<T>(hull: &HullManager<T>) -> Self {
        let indexer = *hull.indexer();
        let mut processed: [HashSet<CellId>; 6] = Default::default();
        let mut sheets = Vec::new();

        // Every closed sheet has a +X face; the other directions only pick
        // up faces left over by ambiguous edge contacts.
        let seed_order = std::iter::once(Direction::PosX)
            .chain(Direction::ALL.into_iter().filter(|&d| d != Direction::PosX));
        for direction in seed_order {
            for &id in hull.hull_ids(direction) {
                if processed[direction.index()].insert(id) {
                    sheets.push(flood_sheet(hull, (direction, id), &mut processed));
                }
            }
        }

        let mut inward: Vec<bool> = sheets.iter().map(Sheet::faces_inward).collect();

        // Solids floating inside a cavity look exterior from their own faces.
        let contained: Vec<usize> = sheets
            .iter()
            .enumerate()
            .filter(|&(i, _)| !inward[i])
            .filter_map(|(i, sheet)| sheet.probe.map(|probe| (i, probe)))
            .filter(|&(_, probe)| {
                sheets
                    .iter()
                    .enumerate()
                    .any(|(j, wall)| inward[j] && wall.encloses(&indexer, probe))
            })
            .map(|(i, _)| i)
            .collect();
        for i in contained {
            inward[i] = true;
        }

        let mut exterior: [HashSet<CellId>; 6] = Default::default();
        let mut interior: [HashSet<CellId>; 6] = Default::default();
        for (sheet, &is_interior) in sheets.iter().zip(&inward) {
            let target = if is_interior {
                &mut interior
            } else {
                &mut exterior
            };
            for &(direction, id) in &sheet.faces {
                target[direction.index()].insert(id);
            }
        }

        let interior_sheets = inward.iter().filter(|&&i| i).count();
        info!(
            "Exterior classification: {} sheets, {} interior",
            sheets.len(),
            interior_sheets
        );

        Self {
            indexer,
            exterior,
            interior,
            sheets: sheets.len(),
            interior_sheets,
        }
    }

    /// Returns `true` if any interior sheet was found.
    #[must_use]
    pub fn has_interior(&self) -> bool {
        self.interior_sheets > 0
    }

    /// Number of sheets.
    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.sheets
    }

    /// Number of interior sheets.
    #[must_use]
    pub fn interior_sheet_count(&self) -> usize {
        self.interior_sheets
    }

    /// Number of exterior sheets.
    #[must_use]
    pub fn exterior_sheet_count(&self) -> usize {
        self.sheets - self.interior_sheets
    }

    /// Faces of the outer skin in `direction`.
    #[must_use]
    pub fn exterior_hull(&self, direction: Direction) -> Vec<VoxelCoord> {
        self.decode_all(&self.exterior[direction.index()])
    }

    /// Faces of cavity walls (and enclosed solids) in `direction`.
    #[must_use]
    pub fn interior_hull(&self, direction: Direction) -> Vec<VoxelCoord> {
        self.decode_all(&self.interior[direction.index()])
    }

    /// Returns `true` if the face of `coord` in `direction` is on the outer
    /// skin.
    #[must_use]
    pub fn is_exterior(&self, coord: VoxelCoord, direction: Direction) -> bool {
        self.indexer
            .encode(coord)
            .is_ok_and(|id| self.exterior[direction.index()].contains(&id))
    }

    /// Empty cells enclosed by interior sheets.
    ///
    /// Sweeps each X line: an interior `+X` face opens a run of empty cells
    /// and the next interior `-X` face on the same line closes it.
    #[must_use]
    pub fn empty_interior(&self) -> Vec<VoxelCoord> {
        let mut openers = self.interior_hull(Direction::PosX);
        let mut closers = self.interior_hull(Direction::NegX);
        openers.sort_unstable_by_key(|c| c.x);
        closers.sort_unstable_by_key(|c| c.x);

        let mut open: HashMap<(i32, i32), i32> = HashMap::new();
        let mut cells = Vec::new();
        let mut unmatched = 0usize;

        let (mut a, mut b) = (openers.iter().peekable(), closers.iter().peekable());
        loop {
            // Closers go first on ties so a shared wall closes before it
            // reopens.
            let take_opener = match (a.peek(), b.peek()) {
                (Some(o), Some(c)) => o.x < c.x,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            if take_opener {
                if let Some(o) = a.next() {
                    open.insert((o.y, o.z), o.x);
                }
            } else if let Some(c) = b.next() {
                match open.remove(&(c.y, c.z)) {
                    Some(start) => {
                        cells.extend((start + 1..c.x).map(|x| VoxelCoord::new(x, c.y, c.z)));
                    }
                    None => unmatched += 1,
                }
            }
        }

        if unmatched > 0 || !open.is_empty() {
            warn!(
                "Interior sweep found {} unmatched closing faces and {} unclosed runs",
                unmatched,
                open.len()
            );
        }

        cells
    }

    /// Occupied cells of `hull` with no face on the outer skin.
    #[must_use]
    pub fn filled_interior<T>(&self, hull: &HullManager<T>) -> Vec<VoxelCoord> {
        hull.positions()
            .filter(|&coord| {
                self.indexer
                    .encode(coord)
                    .is_ok_and(|id| self.exterior.iter().all(|set| !set.contains(&id)))
            })
            .collect()
    }

    fn decode_all(&self, ids: &HashSet<CellId>) -> Vec<VoxelCoord> {
        ids.iter().map(|&id| self.indexer.decode(id)).collect()
    }
}

/// Collects the sheet containing `seed`. The seed must already be marked
/// processed.
fn flood_sheet<T>(
    hull: &HullManager<T>,
    seed: Face,
    processed: &mut [HashSet<CellId>; 6],
) -> Sheet {
    let indexer = hull.indexer();
    let mut sheet = Sheet::default();
    let mut stack = vec![seed];

    while let Some(face) = stack.pop() {
        sheet.push(indexer, face);
        for next in fold_neighbors(hull, face) {
            if processed[next.0.index()].insert(next.1) {
                stack.push(next);
            }
        }
    }

    sheet
}

/// The faces sharing an edge with `face` on the hull surface.
fn fold_neighbors<T>(
    hull: &HullManager<T>,
    (orientation, id): Face,
) -> impl Iterator<Item = Face> + '_ {
    let indexer = *hull.indexer();
    orientation
        .axis()
        .perpendicular()
        .into_iter()
        .flat_map(|axis| [axis.positive(), axis.negative()])
        .filter_map(move |toward| {
            let beside = indexer.step(id, toward);
            let diagonal = indexer.step(beside, orientation);
            let away = toward.opposite();
            if hull.contains_border_id(diagonal, away) {
                Some((away, diagonal))
            } else if hull.contains_border_id(beside, orientation) {
                Some((orientation, beside))
            } else if hull.contains_border_id(id, toward) {
                Some((toward, id))
            } else {
                None
            }
        })
}
