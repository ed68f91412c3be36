//! Crop definitions and the per-cell crop lifecycle.
//!
//! This module provides crop farming mechanics:
//! - Immutable crop definitions shared by every cell planted with them
//! - A catalog of known crops
//! - The cell state machine (Empty → Tilled → Planted → Growing → Ready → Empty)
//! - Growth gated by watering and light

use std::sync::Arc;

use ahash::AHashMap;
use furrow_common::{CropError, CropTypeId, GridCoord, ItemTypeId, WorldPos};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Lifecycle state of a crop cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CropState {
    /// Untouched ground.
    #[default]
    Empty,
    /// Soil prepared for planting.
    Tilled,
    /// Seed in the ground, no visible growth yet.
    Planted,
    /// Past at least one growth stage.
    Growing,
    /// Fully grown, can be harvested.
    Ready,
}

impl CropState {
    /// Get the display name of this state.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Tilled => "Tilled",
            Self::Planted => "Planted",
            Self::Growing => "Growing",
            Self::Ready => "Ready",
        }
    }

    /// Check if a crop is bound in this state.
    #[must_use]
    pub fn has_crop(self) -> bool {
        matches!(self, Self::Planted | Self::Growing | Self::Ready)
    }
}

/// Relative slack when comparing elapsed growth time against stage and
/// total durations.
const GROWTH_TOLERANCE: f64 = 1e-5;

/// Well-known crop type IDs.
pub mod crop_types {
    use super::CropTypeId;

    /// Carrot.
    pub const CARROT: CropTypeId = CropTypeId::new(1);
    /// Wheat.
    pub const WHEAT: CropTypeId = CropTypeId::new(2);
    /// Pumpkin.
    pub const PUMPKIN: CropTypeId = CropTypeId::new(3);
}

/// Definition of a crop type.
///
/// Durations are in simulated seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropDefinition {
    /// Unique identifier.
    pub id: CropTypeId,
    /// Display name.
    pub name: String,
    /// Number of growth stages (visual milestones).
    pub stage_count: u32,
    /// Time spent in each stage.
    pub stage_duration: f32,
    /// Time from planting to ready.
    pub total_duration: f32,
    /// Minimum light level needed to plant (0.0 to 1.0).
    pub min_light: f32,
    /// Item produced on harvest.
    pub yield_item: ItemTypeId,
    /// Amount produced on harvest.
    pub yield_quantity: u32,
    /// Seed item consumed to plant.
    pub seed_item: ItemTypeId,
}

impl CropDefinition {
    /// Create a new crop definition builder.
    #[must_use]
    pub fn builder(id: CropTypeId, name: &str) -> CropDefinitionBuilder {
        CropDefinitionBuilder::new(id, name)
    }

    /// Index of the final stage.
    #[must_use]
    pub fn last_stage(&self) -> u32 {
        self.stage_count.saturating_sub(1)
    }

    /// Check the definition's values.
    pub fn validate(&self) -> Result<(), CropError> {
        if self.stage_count == 0 {
            return Err(CropError::NoStages(self.id));
        }
        for value in [self.stage_duration, self.total_duration] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CropError::InvalidDuration { id: self.id, value });
            }
        }
        if !(0.0..=1.0).contains(&self.min_light) {
            return Err(CropError::InvalidLight {
                id: self.id,
                value: self.min_light,
            });
        }
        Ok(())
    }
}

/// Builder for crop definitions.
#[derive(Debug)]
pub struct CropDefinitionBuilder {
    def: CropDefinition,
}

impl CropDefinitionBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(id: CropTypeId, name: &str) -> Self {
        Self {
            def: CropDefinition {
                id,
                name: name.to_string(),
                stage_count: 4,
                stage_duration: 10.0,
                total_duration: 40.0,
                min_light: 0.2,
                yield_item: ItemTypeId::new(1),
                yield_quantity: 1,
                seed_item: ItemTypeId::new(1),
            },
        }
    }

    /// Set stage count and per-stage duration; total becomes `count * duration`.
    #[must_use]
    pub fn stages(mut self, count: u32, stage_duration: f32) -> Self {
        self.def.stage_count = count;
        self.def.stage_duration = stage_duration;
        self.def.total_duration = count as f32 * stage_duration;
        self
    }

    /// Override the total growth duration.
    #[must_use]
    pub fn total_duration(mut self, total: f32) -> Self {
        self.def.total_duration = total;
        self
    }

    /// Set minimum light.
    #[must_use]
    pub fn min_light(mut self, min_light: f32) -> Self {
        self.def.min_light = min_light;
        self
    }

    /// Set harvest output.
    #[must_use]
    pub fn harvest(mut self, item: ItemTypeId, quantity: u32) -> Self {
        self.def.yield_item = item;
        self.def.yield_quantity = quantity;
        self
    }

    /// Set seed item.
    #[must_use]
    pub fn seed(mut self, item: ItemTypeId) -> Self {
        self.def.seed_item = item;
        self
    }

    /// Validate and build the crop definition.
    pub fn build(self) -> Result<CropDefinition, CropError> {
        self.def.validate()?;
        Ok(self.def)
    }
}

/// Registry of known crop types.
#[derive(Debug, Default, Clone)]
pub struct CropCatalog {
    definitions: AHashMap<CropTypeId, Arc<CropDefinition>>,
}

impl CropCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with the default crops.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::from_definitions(default_crops()).unwrap_or_else(|e| {
            warn!("Default crop definitions rejected: {e}");
            Self::new()
        })
    }

    /// Build a catalog from a list of definitions.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = CropDefinition>,
    ) -> Result<Self, CropError> {
        let mut catalog = Self::new();
        for def in definitions {
            catalog.register(def)?;
        }
        Ok(catalog)
    }

    /// Register a crop definition.
    pub fn register(&mut self, definition: CropDefinition) -> Result<Arc<CropDefinition>, CropError> {
        definition.validate()?;
        if self.definitions.contains_key(&definition.id) {
            return Err(CropError::Duplicate(definition.id));
        }
        let def = Arc::new(definition);
        self.definitions.insert(def.id, Arc::clone(&def));
        Ok(def)
    }

    /// Get a crop definition by ID.
    #[must_use]
    pub fn get(&self, id: CropTypeId) -> Option<Arc<CropDefinition>> {
        self.definitions.get(&id).cloned()
    }

    /// Number of registered crops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate over all definitions.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CropDefinition>> {
        self.definitions.values()
    }
}

/// The built-in crops.
#[must_use]
pub fn default_crops() -> Vec<CropDefinition> {
    vec![
        CropDefinition {
            id: crop_types::CARROT,
            name: "Carrot".to_string(),
            stage_count: 4,
            stage_duration: 10.0,
            total_duration: 40.0,
            min_light: 0.2,
            yield_item: ItemTypeId::new(10),
            yield_quantity: 1,
            seed_item: ItemTypeId::new(11),
        },
        CropDefinition {
            id: crop_types::WHEAT,
            name: "Wheat".to_string(),
            stage_count: 3,
            stage_duration: 15.0,
            total_duration: 45.0,
            min_light: 0.4,
            yield_item: ItemTypeId::new(12),
            yield_quantity: 3,
            seed_item: ItemTypeId::new(13),
        },
        CropDefinition {
            id: crop_types::PUMPKIN,
            name: "Pumpkin".to_string(),
            stage_count: 5,
            stage_duration: 20.0,
            total_duration: 100.0,
            min_light: 0.5,
            yield_item: ItemTypeId::new(14),
            yield_quantity: 1,
            seed_item: ItemTypeId::new(15),
        },
    ]
}

/// What a harvest produced.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestYield {
    /// Crop that was harvested.
    pub crop: CropTypeId,
    /// Item produced.
    pub item: ItemTypeId,
    /// Amount produced.
    pub quantity: u32,
    /// Cell that was harvested.
    pub coord: GridCoord,
    /// Where the yield appears in the world.
    pub position: WorldPos,
}

/// Result of a growth step on one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthOutcome {
    /// Cell is not in a growing state.
    Idle,
    /// Growing state without a bound crop.
    MissingCrop,
    /// Unwatered, too dark, or no time passed; nothing accumulated.
    Dormant,
    /// Time accumulated within the current stage.
    Accumulated,
    /// Reached a new stage (or left `Planted`).
    Advanced {
        /// The new stage index.
        stage: u32,
    },
    /// Became ready to harvest.
    Ready,
}

impl GrowthOutcome {
    /// Check if the cell's visible state or stage changed.
    #[must_use]
    pub fn changed(self) -> bool {
        matches!(self, Self::Advanced { .. } | Self::Ready)
    }
}

/// One grid cell of farmland and its crop lifecycle.
#[derive(Debug, Clone)]
pub struct CropCell {
    coord: GridCoord,
    world_pos: WorldPos,
    state: CropState,
    watered: bool,
    growth_elapsed: f64,
    stage: u32,
    crop: Option<Arc<CropDefinition>>,
}

impl CropCell {
    /// Create an empty cell.
    #[must_use]
    pub fn new(coord: GridCoord, world_pos: WorldPos) -> Self {
        Self {
            coord,
            world_pos,
            state: CropState::Empty,
            watered: false,
            growth_elapsed: 0.0,
            stage: 0,
            crop: None,
        }
    }

    /// Grid coordinate of this cell.
    #[must_use]
    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    /// World position of this cell.
    #[must_use]
    pub fn world_pos(&self) -> WorldPos {
        self.world_pos
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> CropState {
        self.state
    }

    /// Whether the soil is watered.
    #[must_use]
    pub fn is_watered(&self) -> bool {
        self.watered
    }

    /// Accumulated growth time.
    #[must_use]
    pub fn growth_elapsed(&self) -> f64 {
        self.growth_elapsed
    }

    /// Current growth stage index.
    #[must_use]
    pub fn stage(&self) -> u32 {
        self.stage
    }

    /// Bound crop definition, if any.
    #[must_use]
    pub fn crop(&self) -> Option<&Arc<CropDefinition>> {
        self.crop.as_ref()
    }

    /// Growth progress toward ready (0.0 to 1.0).
    #[must_use]
    pub fn progress(&self) -> f32 {
        match &self.crop {
            Some(def) => {
                (self.growth_elapsed / f64::from(def.total_duration)).clamp(0.0, 1.0) as f32
            },
            None => 0.0,
        }
    }

    /// Check if the cell can be tilled.
    #[must_use]
    pub fn can_till(&self) -> bool {
        self.state == CropState::Empty
    }

    /// Check if the cell can be watered.
    #[must_use]
    pub fn can_water(&self) -> bool {
        matches!(
            self.state,
            CropState::Tilled | CropState::Planted | CropState::Growing
        )
    }

    /// Check if a seed can be planted.
    #[must_use]
    pub fn can_plant(&self) -> bool {
        self.state == CropState::Tilled
    }

    /// Check if the cell can be harvested.
    #[must_use]
    pub fn can_harvest(&self) -> bool {
        self.state == CropState::Ready
    }

    /// Till the soil. Returns false if the cell was not empty.
    pub fn till(&mut self) -> bool {
        if !self.can_till() {
            return false;
        }
        self.state = CropState::Tilled;
        true
    }

    /// Water the soil. Returns false if there is nothing to water.
    pub fn water(&mut self) -> bool {
        if !self.can_water() {
            return false;
        }
        self.watered = true;
        true
    }

    /// Plant a crop. Returns false unless the cell is tilled.
    ///
    /// Planting resets growth and dries the soil.
    pub fn plant(&mut self, crop: &Arc<CropDefinition>) -> bool {
        if !self.can_plant() {
            return false;
        }
        self.crop = Some(Arc::clone(crop));
        self.state = CropState::Planted;
        self.stage = 0;
        self.growth_elapsed = 0.0;
        self.watered = false;
        true
    }

    /// Advance growth by `dt` seconds.
    ///
    /// Time only accumulates while watered and inside the growing hours
    /// (`growable`); time outside those conditions is dropped, not banked.
    pub fn grow(&mut self, dt: f64, growable: bool) -> GrowthOutcome {
        if !matches!(self.state, CropState::Planted | CropState::Growing) {
            return GrowthOutcome::Idle;
        }
        let Some(def) = self.crop.clone() else {
            trace!("Growth step on {} with no crop bound", self.coord);
            return GrowthOutcome::MissingCrop;
        };
        if !self.watered || !growable || !dt.is_finite() || dt <= 0.0 {
            return GrowthOutcome::Dormant;
        }

        let before = (self.state, self.stage);
        let last = def.last_stage();
        self.growth_elapsed += dt;

        // Boundaries are matched within a relative tolerance so the result
        // does not depend on how the elapsed time was split into ticks.
        let stages = self.growth_elapsed / f64::from(def.stage_duration);
        let reached = (stages + stages.max(1.0) * GROWTH_TOLERANCE).floor() as u32;
        if reached > self.stage {
            self.stage = reached.min(last);
            self.state = CropState::Growing;
        }
        if self.growth_elapsed >= f64::from(def.total_duration) * (1.0 - GROWTH_TOLERANCE) {
            self.stage = last;
            self.state = CropState::Ready;
        }

        if self.state == CropState::Ready {
            GrowthOutcome::Ready
        } else if (self.state, self.stage) != before {
            GrowthOutcome::Advanced { stage: self.stage }
        } else {
            GrowthOutcome::Accumulated
        }
    }

    /// Harvest a ready crop, returning its yield and emptying the cell.
    pub fn harvest(&mut self) -> Option<HarvestYield> {
        if !self.can_harvest() {
            return None;
        }
        let def = self.crop.take()?;
        let harvested = HarvestYield {
            crop: def.id,
            item: def.yield_item,
            quantity: def.yield_quantity,
            coord: self.coord,
            position: self.world_pos,
        };
        self.clear();
        Some(harvested)
    }

    /// Return the cell to `Empty`, discarding any crop.
    pub fn reset(&mut self) {
        self.crop = None;
        self.clear();
    }

    fn clear(&mut self) {
        self.state = CropState::Empty;
        self.stage = 0;
        self.growth_elapsed = 0.0;
        self.watered = false;
    }
}
