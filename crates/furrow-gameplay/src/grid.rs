//! Farm grid storage.
//!
//! A fixed-size 2D array of crop cells laid out in world space. Cells are
//! created once by [`GridStore::build`] and only ever reset in place.

use furrow_common::{GridCoord, WorldPos};
use tracing::debug;

use crate::crops::{CropCell, CropState};

/// Fixed-size grid of crop cells.
#[derive(Debug, Clone)]
pub struct GridStore {
    origin: WorldPos,
    cell_size: f32,
    width: u32,
    height: u32,
    cells: Vec<CropCell>,
}

impl GridStore {
    /// Allocate `width * height` empty cells.
    ///
    /// Cell `(x, y)` sits at `origin + (x, y) * cell_size`. A cell size that
    /// is not a positive finite number leaves world-position lookups empty.
    #[must_use]
    pub fn build(origin: WorldPos, cell_size: f32, width: u32, height: u32) -> Self {
        let cells = (0..width as usize * height as usize)
            .map(|index| GridCoord::from_index(index, width))
            .map(|coord| CropCell::new(coord, coord.to_world(origin, cell_size)))
            .collect();
        debug!("Built {width}x{height} farm grid at {origin} (cell size {cell_size})");
        Self {
            origin,
            cell_size,
            width,
            height,
            cells,
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// World position of cell (0, 0).
    #[must_use]
    pub const fn origin(&self) -> WorldPos {
        self.origin
    }

    /// Size of one cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check whether a coordinate is inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: GridCoord) -> bool {
        coord.in_bounds(self.width, self.height)
    }

    /// Get the cell at a grid coordinate.
    #[must_use]
    pub fn cell_at(&self, coord: GridCoord) -> Option<&CropCell> {
        let index = coord.to_index(self.width, self.height)?;
        self.cells.get(index)
    }

    /// Get a mutable reference to the cell at a grid coordinate.
    pub fn cell_at_mut(&mut self, coord: GridCoord) -> Option<&mut CropCell> {
        let index = coord.to_index(self.width, self.height)?;
        self.cells.get_mut(index)
    }

    /// Convert a world position to a grid coordinate inside the grid.
    #[must_use]
    pub fn world_to_grid(&self, pos: WorldPos) -> Option<GridCoord> {
        GridCoord::from_world(pos, self.origin, self.cell_size).filter(|c| self.contains(*c))
    }

    /// Convert a grid coordinate to its world position.
    #[must_use]
    pub fn grid_to_world(&self, coord: GridCoord) -> WorldPos {
        coord.to_world(self.origin, self.cell_size)
    }

    /// Get the cell containing a world position.
    #[must_use]
    pub fn cell_at_world(&self, pos: WorldPos) -> Option<&CropCell> {
        self.cell_at(self.world_to_grid(pos)?)
    }

    /// Get a mutable reference to the cell containing a world position.
    pub fn cell_at_world_mut(&mut self, pos: WorldPos) -> Option<&mut CropCell> {
        let coord = self.world_to_grid(pos)?;
        self.cell_at_mut(coord)
    }

    /// Iterate over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &CropCell> {
        self.cells.iter()
    }

    /// Count cells in a given state.
    #[must_use]
    pub fn count_in_state(&self, state: CropState) -> usize {
        self.cells.iter().filter(|c| c.state() == state).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_build_allocates_empty_cells() {
        let grid = GridStore::build(Vec2::ZERO, 1.0, 4, 3);
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.count_in_state(CropState::Empty), 12);
        for cell in grid.iter() {
            assert_eq!(grid.cell_at(cell.coord()).map(CropCell::coord), Some(cell.coord()));
        }
    }

    #[test]
    fn test_out_of_bounds_is_none() {
        let grid = GridStore::build(Vec2::ZERO, 1.0, 2, 1);
        assert!(grid.cell_at(GridCoord::new(1, 0)).is_some());
        assert!(grid.cell_at(GridCoord::new(2, 0)).is_none());
        assert!(grid.cell_at(GridCoord::new(0, 1)).is_none());
        assert!(grid.cell_at(GridCoord::new(-1, 0)).is_none());
    }

    #[test]
    fn test_world_lookup() {
        let grid = GridStore::build(Vec2::new(10.0, -4.0), 2.0, 3, 3);
        let cell = grid.cell_at_world(Vec2::new(13.5, -0.5)).expect("inside grid");
        assert_eq!(cell.coord(), GridCoord::new(1, 1));
        assert_eq!(cell.world_pos(), Vec2::new(12.0, -2.0));

        assert!(grid.cell_at_world(Vec2::new(9.9, -4.0)).is_none());
        assert!(grid.cell_at_world(Vec2::new(16.0, 0.0)).is_none());
    }

    #[test]
    fn test_invalid_cell_size_disables_world_lookup() {
        let grid = GridStore::build(Vec2::ZERO, 0.0, 2, 2);
        assert!(grid.cell_at_world(Vec2::new(0.5, 0.5)).is_none());
        assert!(grid.cell_at(GridCoord::new(1, 1)).is_some());
    }

    #[test]
    fn test_mutation_through_lookup() {
        let mut grid = GridStore::build(Vec2::ZERO, 1.0, 2, 2);
        let cell = grid.cell_at_world_mut(Vec2::new(1.2, 0.3)).expect("inside grid");
        assert!(cell.till());
        assert_eq!(grid.count_in_state(CropState::Tilled), 1);
        assert_eq!(
            grid.cell_at(GridCoord::new(1, 0)).map(CropCell::state),
            Some(CropState::Tilled)
        );
    }
}
