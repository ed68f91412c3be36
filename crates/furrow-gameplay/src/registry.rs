//! Registry of actively growing crop cells.
//!
//! The grid owns the cells; the registry only remembers which coordinates
//! need growth updates. Membership is insertion-ordered so a run replays
//! identically.

use furrow_common::GridCoord;
use tracing::trace;

use crate::crops::{CropState, GrowthOutcome};
use crate::grid::GridStore;

/// A cell whose visible state changed during a growth step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    /// Cell coordinate.
    pub coord: GridCoord,
    /// State after the step.
    pub state: CropState,
    /// Growth stage after the step.
    pub stage: u32,
}

/// Set of planted cells polled for growth.
#[derive(Debug, Default, Clone)]
pub struct CropRegistry {
    active: Vec<GridCoord>,
}

impl CropRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell. Returns false if it was already registered.
    pub fn register(&mut self, coord: GridCoord) -> bool {
        if self.active.contains(&coord) {
            return false;
        }
        self.active.push(coord);
        true
    }

    /// Remove a cell. Returns false if it was not registered.
    pub fn unregister(&mut self, coord: GridCoord) -> bool {
        let before = self.active.len();
        self.active.retain(|c| *c != coord);
        self.active.len() != before
    }

    /// Check if a cell is registered.
    #[must_use]
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.active.contains(&coord)
    }

    /// Number of registered cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Check if no cells are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Iterate over registered coordinates.
    pub fn iter(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.active.iter().copied()
    }

    /// Advance growth on every registered cell.
    ///
    /// `growable` is whether the clock is inside the growing hours. Cells
    /// that are empty (harvested or reset elsewhere) or missing from the grid
    /// are pruned. Returns the cells whose state or stage changed.
    pub fn tick(&mut self, grid: &mut GridStore, dt: f64, growable: bool) -> Vec<CellChange> {
        let mut changes = Vec::new();
        let mut pruned = Vec::new();

        for coord in self.active.clone() {
            let Some(cell) = grid.cell_at_mut(coord) else {
                pruned.push(coord);
                continue;
            };

            let outcome = cell.grow(dt, growable);
            if outcome.changed() {
                changes.push(CellChange {
                    coord,
                    state: cell.state(),
                    stage: cell.stage(),
                });
            }
            if outcome == GrowthOutcome::MissingCrop || cell.state() == CropState::Empty {
                pruned.push(coord);
            }
        }

        for coord in pruned {
            trace!("Pruning {coord} from crop registry");
            self.unregister(coord);
        }
        changes
    }
}
