//! Farming actions.
//!
//! Maps the selected tool onto a resolved cell. Invalid requests are
//! rejected quietly: the cell is left untouched and the reason is logged
//! and returned, never raised as an error.

use std::sync::Arc;

use furrow_common::GridCoord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::crops::{CropCell, CropDefinition, HarvestYield};
use crate::registry::CropRegistry;

/// Default minimum light level for harvesting.
pub const DEFAULT_HARVEST_MIN_LIGHT: f32 = 0.15;

/// Tool selected on the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FarmingTool {
    /// Nothing selected.
    #[default]
    None,
    /// Tills empty ground.
    Hoe,
    /// Waters tilled or planted soil.
    Water,
    /// Plants the selected seed.
    Seed,
    /// Harvests ready crops.
    Harvest,
}

/// Why an action did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// No tool selected.
    NoTool,
    /// The cell's state does not allow this action.
    InvalidState,
    /// Seed tool used with no seed selected.
    NoSeedSelected,
    /// The inventory holds none of the selected seed.
    OutOfSeeds,
    /// Not enough light.
    TooDark,
}

/// Result of applying a tool to a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// Soil was tilled.
    Tilled,
    /// Soil was watered.
    Watered,
    /// A seed was planted and registered for growth.
    Planted(Arc<CropDefinition>),
    /// A crop was harvested.
    Harvested(HarvestYield),
    /// Nothing happened.
    Rejected(RejectReason),
}

impl ActionOutcome {
    /// Check if the cell changed.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Tool and seed selection plus the rules for applying them.
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    tool: FarmingTool,
    selected_crop: Option<Arc<CropDefinition>>,
    harvest_min_light: f32,
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_HARVEST_MIN_LIGHT)
    }
}

impl ActionDispatcher {
    /// Create a dispatcher with no tool or seed selected.
    #[must_use]
    pub fn new(harvest_min_light: f32) -> Self {
        Self {
            tool: FarmingTool::None,
            selected_crop: None,
            harvest_min_light,
        }
    }

    /// Currently selected tool.
    #[must_use]
    pub fn tool(&self) -> FarmingTool {
        self.tool
    }

    /// Currently selected seed.
    #[must_use]
    pub fn selected_crop(&self) -> Option<&Arc<CropDefinition>> {
        self.selected_crop.as_ref()
    }

    /// Minimum light needed to harvest.
    #[must_use]
    pub fn harvest_min_light(&self) -> f32 {
        self.harvest_min_light
    }

    /// Select a tool. Returns false if it was already selected.
    pub fn set_tool(&mut self, tool: FarmingTool) -> bool {
        if self.tool == tool {
            return false;
        }
        debug!("{tool:?} selected");
        self.tool = tool;
        true
    }

    /// Select the seed planted by the seed tool.
    pub fn select_crop(&mut self, crop: Option<Arc<CropDefinition>>) {
        if let Some(def) = &crop {
            debug!("{} selected", def.name);
        }
        self.selected_crop = crop;
    }

    /// Apply the selected tool to a cell.
    ///
    /// `light` is the current light level. Successful plants are registered
    /// with the registry and harvests unregistered.
    pub fn apply(
        &self,
        cell: &mut CropCell,
        registry: &mut CropRegistry,
        light: f32,
    ) -> ActionOutcome {
        self.apply_with_seeds(cell, registry, light, true)
    }

    /// Apply the selected tool, planting only if `seed_available`.
    pub fn apply_with_seeds(
        &self,
        cell: &mut CropCell,
        registry: &mut CropRegistry,
        light: f32,
        seed_available: bool,
    ) -> ActionOutcome {
        let coord = cell.coord();
        let outcome = match self.tool {
            FarmingTool::None => ActionOutcome::Rejected(RejectReason::NoTool),
            FarmingTool::Hoe => {
                if cell.till() {
                    ActionOutcome::Tilled
                } else {
                    ActionOutcome::Rejected(RejectReason::InvalidState)
                }
            },
            FarmingTool::Water => {
                if cell.water() {
                    ActionOutcome::Watered
                } else {
                    ActionOutcome::Rejected(RejectReason::InvalidState)
                }
            },
            FarmingTool::Seed => self.plant(cell, coord, registry, light, seed_available),
            FarmingTool::Harvest => self.harvest(cell, coord, registry, light),
        };

        if let ActionOutcome::Rejected(reason) = outcome {
            log_rejection(self.tool, coord, reason);
        }
        outcome
    }

    fn plant(
        &self,
        cell: &mut CropCell,
        coord: GridCoord,
        registry: &mut CropRegistry,
        light: f32,
        seed_available: bool,
    ) -> ActionOutcome {
        let Some(def) = &self.selected_crop else {
            return ActionOutcome::Rejected(RejectReason::NoSeedSelected);
        };
        if light < def.min_light || light.is_nan() {
            return ActionOutcome::Rejected(RejectReason::TooDark);
        }
        if !cell.can_plant() {
            return ActionOutcome::Rejected(RejectReason::InvalidState);
        }
        if !seed_available {
            return ActionOutcome::Rejected(RejectReason::OutOfSeeds);
        }
        if !cell.plant(def) {
            return ActionOutcome::Rejected(RejectReason::InvalidState);
        }
        registry.register(coord);
        ActionOutcome::Planted(Arc::clone(def))
    }

    fn harvest(
        &self,
        cell: &mut CropCell,
        coord: GridCoord,
        registry: &mut CropRegistry,
        light: f32,
    ) -> ActionOutcome {
        if !cell.can_harvest() {
            return ActionOutcome::Rejected(RejectReason::InvalidState);
        }
        if light < self.harvest_min_light || light.is_nan() {
            return ActionOutcome::Rejected(RejectReason::TooDark);
        }
        match cell.harvest() {
            Some(harvested) => {
                registry.unregister(coord);
                ActionOutcome::Harvested(harvested)
            },
            None => ActionOutcome::Rejected(RejectReason::InvalidState),
        }
    }
}

fn log_rejection(tool: FarmingTool, coord: GridCoord, reason: RejectReason) {
    match reason {
        RejectReason::NoSeedSelected => warn!("No seed selected"),
        RejectReason::OutOfSeeds => warn!("Out of seeds for {coord}"),
        RejectReason::TooDark => warn!("Too dark to use {tool:?} on {coord}; wait for more light"),
        RejectReason::NoTool | RejectReason::InvalidState => {
            debug!("{tool:?} does nothing on {coord}");
        },
    }
}
