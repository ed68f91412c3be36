//! Simulation configuration.
//!
//! Provides tunable parameters for the clock, grid, growth and economy.
//! Configuration can be loaded from and saved to a TOML file.

use std::fs;
use std::path::Path;

use furrow_common::{FurrowError, FurrowResult, ItemTypeId};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::clock::{DEFAULT_DAY_LENGTH_SECONDS, DEFAULT_START_HOUR};
use crate::crops::{default_crops, CropDefinition};
use crate::economy::{ItemDefinition, ShopListing};
use crate::farming::DEFAULT_HARVEST_MIN_LIGHT;
use crate::light::LightCurve;

/// Farm grid layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// World position of cell (0, 0)
    pub origin: [f32; 2],
    /// Cell size in world units
    pub cell_size: f32,
    /// Width in cells
    pub width: u32,
    /// Height in cells
    pub height: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            origin: [0.0, 0.0],
            cell_size: 1.0,
            width: 8,
            height: 6,
        }
    }
}

impl GridConfig {
    /// Origin as a world position.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::from(self.origin)
    }
}

/// Farm simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    // === Time ===
    /// Real seconds per game day
    pub day_length_seconds: f32,
    /// Starting hour (0-24)
    pub start_hour: f32,
    /// Starting day (>= 1)
    pub start_day: u32,
    /// Hour to light level mapping
    pub light: LightCurve,

    // === Growth ===
    /// Seconds between crop growth updates (0 = every tick)
    pub growth_update_interval: f32,
    /// Minimum light to harvest
    pub harvest_min_light: f32,
    /// Planting consumes one seed item from the inventory
    pub require_seeds: bool,

    // === World ===
    /// Grid layout
    pub grid: GridConfig,

    // === Economy ===
    /// Distinct item types the inventory holds
    pub inventory_capacity: u32,
    /// Starting gold
    pub starting_gold: u64,
    /// Item definitions
    pub items: Vec<ItemDefinition>,
    /// Shop offers
    pub shop: Vec<ShopListing>,

    // === Data ===
    /// Crop definitions
    pub crops: Vec<CropDefinition>,
    /// Event bus capacity
    pub event_capacity: usize,
}

impl Default for FarmConfig {
    fn default() -> Self {
        let crops = default_crops();
        let mut items = Vec::new();
        let mut shop = Vec::new();
        for crop in &crops {
            let value = u64::from(crop.stage_count) * 5;
            items.push(ItemDefinition {
                id: crop.seed_item,
                name: format!("{} Seeds", crop.name),
                value: value / 2,
                sellable: true,
            });
            items.push(ItemDefinition {
                id: crop.yield_item,
                name: crop.name.clone(),
                value: value * 3,
                sellable: true,
            });
            shop.push(ShopListing {
                item: crop.seed_item,
                price: value / 2 + 1,
                stock: None,
            });
        }

        Self {
            day_length_seconds: DEFAULT_DAY_LENGTH_SECONDS,
            start_hour: DEFAULT_START_HOUR,
            start_day: 1,
            light: LightCurve::default(),
            growth_update_interval: 1.0,
            harvest_min_light: DEFAULT_HARVEST_MIN_LIGHT,
            require_seeds: false,
            grid: GridConfig::default(),
            inventory_capacity: 100,
            starting_gold: 50,
            items,
            shop,
            crops,
            event_capacity: 1024,
        }
    }
}

impl FarmConfig {
    /// Load configuration from a path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }
        match Self::try_load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config file: {e}");
                Self::default()
            },
        }
    }

    /// Load configuration from a path, reporting failures.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> FurrowResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> FurrowResult<Self> {
        toml::from_str(contents).map_err(|e| FurrowError::Serialization(e.to_string()))
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> FurrowResult<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| FurrowError::Serialization(e.to_string()))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Time
        if !self.day_length_seconds.is_finite() {
            self.day_length_seconds = DEFAULT_DAY_LENGTH_SECONDS;
        }
        self.day_length_seconds = self.day_length_seconds.clamp(1.0, 86_400.0);
        if !self.start_hour.is_finite() {
            self.start_hour = DEFAULT_START_HOUR;
        }
        self.start_hour = self.start_hour.rem_euclid(24.0);
        self.start_day = self.start_day.max(1);

        // Growth
        if !self.growth_update_interval.is_finite() {
            self.growth_update_interval = 1.0;
        }
        self.growth_update_interval = self.growth_update_interval.clamp(0.0, 3600.0);
        if !self.harvest_min_light.is_finite() {
            self.harvest_min_light = DEFAULT_HARVEST_MIN_LIGHT;
        }
        self.harvest_min_light = self.harvest_min_light.clamp(0.0, 1.0);

        // World
        if !self.grid.cell_size.is_finite() || self.grid.cell_size <= 0.0 {
            self.grid.cell_size = 1.0;
        }
        self.grid.width = self.grid.width.clamp(1, 1024);
        self.grid.height = self.grid.height.clamp(1, 1024);

        // Economy
        self.inventory_capacity = self.inventory_capacity.max(1);
        self.event_capacity = self.event_capacity.clamp(16, 1 << 20);
    }

    /// Look up an item definition.
    #[must_use]
    pub fn item(&self, id: ItemTypeId) -> Option<&ItemDefinition> {
        self.items.iter().find(|i| i.id == id)
    }
}
