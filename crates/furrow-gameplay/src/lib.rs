//! # Furrow Gameplay
//!
//! Farming simulation core for Furrow.
//!
//! This crate provides the headless farm model:
//! - Day/night clock with sunrise, sunset and new-day events
//! - Light curve mapping hour of day to light level
//! - Grid store of crop cells over world space
//! - Crop cell state machine (till, water, plant, grow, harvest)
//! - Crop registry that ticks growing cells
//! - Tool dispatcher for player actions
//! - Inventory, wallet and seed shop
//! - Event bus for inter-system communication
//! - Simulation driver tying it together per frame

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod clock;
pub mod config;
pub mod crops;
pub mod economy;
pub mod events;
pub mod farming;
pub mod grid;
pub mod inventory;
pub mod light;
pub mod registry;
pub mod simulation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::clock::*;
    pub use crate::config::*;
    pub use crate::crops::*;
    pub use crate::economy::*;
    pub use crate::events::*;
    pub use crate::farming::*;
    pub use crate::grid::*;
    pub use crate::inventory::*;
    pub use crate::light::*;
    pub use crate::registry::*;
    pub use crate::simulation::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_add_remove() {
        use furrow_common::ItemTypeId;

        let mut inv = Inventory::new(10);
        let item_id = ItemTypeId::new(1);

        assert!(inv.add(item_id, 5).is_ok());
        assert_eq!(inv.count(item_id), 5);

        assert!(inv.remove(item_id, 3).is_ok());
        assert_eq!(inv.count(item_id), 2);
    }

    #[test]
    fn test_clock_starts_at_dawn() {
        let clock = Clock::new(DEFAULT_DAY_LENGTH_SECONDS);
        assert_eq!(clock.day(), 1);
        assert!(clock.is_day());
        assert_eq!(clock.format_time(), "06:00");
    }

    #[test]
    fn test_default_catalog() {
        let catalog = CropCatalog::with_defaults();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.get(crop_types::WHEAT).is_some());
    }

    #[test]
    fn test_grid_starts_empty() {
        let grid = GridStore::build(glam::Vec2::ZERO, 1.0, 4, 4);
        assert_eq!(grid.count_in_state(CropState::Empty), 16);
    }
}
