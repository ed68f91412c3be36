//! Coordinate types for grid cells and world positions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// World position in scene units.
pub type WorldPos = Vec2;

/// Grid coordinate (identifies a cell in the farm grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    /// X coordinate in grid space
    pub x: i32,
    /// Y coordinate in grid space
    pub y: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Checks whether the coordinate lies inside a `width` x `height` grid.
    #[must_use]
    pub const fn in_bounds(self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as i64) < width as i64 && (self.y as i64) < height as i64
    }

    /// Converts to linear index for array access.
    ///
    /// Returns `None` if the coordinate is outside the grid.
    #[must_use]
    pub const fn to_index(self, width: u32, height: u32) -> Option<usize> {
        if !self.in_bounds(width, height) {
            return None;
        }
        Some((self.y as usize) * (width as usize) + (self.x as usize))
    }

    /// Creates from linear index.
    #[must_use]
    pub const fn from_index(index: usize, width: u32) -> Self {
        let width = if width == 0 { 1 } else { width as usize };
        Self {
            x: (index % width) as i32,
            y: (index / width) as i32,
        }
    }

    /// Converts a world position to the grid coordinate containing it.
    ///
    /// Uses `floor((pos - origin) / cell_size)` per axis. Returns `None` when
    /// `cell_size` is not a positive finite number or the result does not fit.
    #[must_use]
    pub fn from_world(pos: WorldPos, origin: WorldPos, cell_size: f32) -> Option<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return None;
        }
        let local = ((pos - origin) / cell_size).floor();
        if !local.is_finite() {
            return None;
        }
        let (min, max) = (i32::MIN as f32, i32::MAX as f32);
        if local.x < min || local.x > max || local.y < min || local.y > max {
            return None;
        }
        Some(Self::new(local.x as i32, local.y as i32))
    }

    /// Converts to the world position of the cell's lower-left corner.
    #[must_use]
    pub fn to_world(self, origin: WorldPos, cell_size: f32) -> WorldPos {
        origin + Vec2::new(self.x as f32, self.y as f32) * cell_size
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
