//! Headless farm simulation driver.
//!
//! Owns every piece of farm state and advances it once per host frame:
//! the clock first, then crop growth. All notifications go out through the
//! [`EventBus`].

use std::fmt;

use furrow_common::{
    CropError, CropTypeId, FurrowError, FurrowResult, GridCoord, ItemTypeId, WorldPos,
};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::FarmConfig;
use crate::crops::CropCatalog;
use crate::economy::{EconomyResult, Shop, Wallet};
use crate::events::{EventBus, FarmEvent};
use crate::farming::{ActionDispatcher, ActionOutcome, FarmingTool};
use crate::grid::GridStore;
use crate::inventory::Inventory;
use crate::light::LightCurve;
use crate::registry::CropRegistry;

/// Totals reported when a session ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// Final day number
    pub day: u32,
    /// Final hour of day
    pub hour: f32,
    /// Simulation ticks run
    pub ticks: u64,
    /// Crops harvested
    pub harvests: u32,
    /// Crops still in the ground
    pub growing: usize,
    /// Gold at the end
    pub gold: u64,
    /// Shop purchases and sales made
    pub transactions: usize,
    /// Inventory contents
    pub items: Vec<(ItemTypeId, u32)>,
    /// Events nobody drained before shutdown
    pub undelivered_events: usize,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {} {:05.2}h after {} ticks: {} harvested, {} growing, {} gold \
             ({} trades), {} item types",
            self.day,
            self.hour,
            self.ticks,
            self.harvests,
            self.growing,
            self.gold,
            self.transactions,
            self.items.len()
        )
    }
}

/// The farm and everything on it.
#[derive(Debug)]
pub struct FarmSimulation {
    clock: Clock,
    light: LightCurve,
    grid: GridStore,
    registry: CropRegistry,
    dispatcher: ActionDispatcher,
    catalog: CropCatalog,
    inventory: Inventory,
    wallet: Wallet,
    shop: Shop,
    events: EventBus,
    growth_interval: f64,
    growth_accumulator: f64,
    require_seeds: bool,
    ticks: u64,
    harvests: u32,
}

impl FarmSimulation {
    /// Build a simulation from configuration.
    ///
    /// The configuration is validated (clamped) first; invalid crop
    /// definitions are an error.
    pub fn new(mut config: FarmConfig) -> FurrowResult<Self> {
        config.validate();
        let catalog = CropCatalog::from_definitions(config.crops.iter().cloned())?;
        if catalog.is_empty() {
            return Err(FurrowError::Config("no crops defined".to_string()));
        }

        let grid = GridStore::build(
            config.grid.origin(),
            config.grid.cell_size,
            config.grid.width,
            config.grid.height,
        );

        let mut shop = Shop::new(config.items.iter().cloned());
        for listing in &config.shop {
            if shop.item(listing.item).is_none() {
                warn!("Shop lists undefined item {:?}", listing.item);
            }
            shop.add_listing(listing.clone());
        }

        info!(
            "Farm ready: {}x{} grid, {} crops, day length {}s",
            grid.width(),
            grid.height(),
            catalog.len(),
            config.day_length_seconds
        );

        Ok(Self {
            clock: Clock::with_time(config.start_hour, config.start_day, config.day_length_seconds),
            light: config.light,
            grid,
            registry: CropRegistry::new(),
            dispatcher: ActionDispatcher::new(config.harvest_min_light),
            catalog,
            inventory: Inventory::new(config.inventory_capacity),
            wallet: Wallet::new(config.starting_gold),
            shop,
            events: EventBus::new(config.event_capacity),
            growth_interval: f64::from(config.growth_update_interval),
            growth_accumulator: 0.0,
            require_seeds: config.require_seeds,
            ticks: 0,
            harvests: 0,
        })
    }

    /// The clock.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// The farm grid.
    #[must_use]
    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    /// The growing crops.
    #[must_use]
    pub fn registry(&self) -> &CropRegistry {
        &self.registry
    }

    /// Tool and seed selection.
    #[must_use]
    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    /// Known crops.
    #[must_use]
    pub fn catalog(&self) -> &CropCatalog {
        &self.catalog
    }

    /// The player's inventory.
    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable access to the player's inventory.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// The player's gold.
    #[must_use]
    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// The shop.
    #[must_use]
    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    /// Crops harvested so far.
    #[must_use]
    pub fn harvests(&self) -> u32 {
        self.harvests
    }

    /// Current light level.
    #[must_use]
    pub fn light_level(&self) -> f32 {
        self.light.light_at(self.clock.hour())
    }

    /// Drain pending events.
    pub fn drain_events(&self) -> Vec<FarmEvent> {
        self.events.drain()
    }

    /// Advance the simulation by `dt` real seconds.
    ///
    /// The clock advances first; crops then grow if the new hour is inside
    /// the growing hours, once enough time has accumulated for a growth
    /// update.
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.ticks += 1;

        for event in self.clock.advance(dt) {
            info!("{}", event.description());
            self.publish(FarmEvent::Clock(event));
        }

        self.growth_accumulator += f64::from(dt);
        if self.growth_accumulator < self.growth_interval {
            return;
        }
        let step = std::mem::take(&mut self.growth_accumulator);
        let growable = self.clock.is_growing_hour();
        for change in self.registry.tick(&mut self.grid, step, growable) {
            debug!("{} is now {:?} (stage {})", change.coord, change.state, change.stage);
            self.publish(FarmEvent::CellChanged {
                coord: change.coord,
                state: change.state,
                stage: change.stage,
            });
        }
    }

    /// Select a tool.
    pub fn set_tool(&mut self, tool: FarmingTool) {
        if self.dispatcher.set_tool(tool) {
            self.publish(FarmEvent::ToolChanged(tool));
        }
    }

    /// Select the seed to plant, or clear the selection.
    pub fn select_crop(&mut self, crop: Option<CropTypeId>) -> Result<(), CropError> {
        let def = match crop {
            Some(id) => Some(self.catalog.get(id).ok_or(CropError::Unknown(id))?),
            None => None,
        };
        self.dispatcher.select_crop(def);
        self.publish(FarmEvent::CropSelected(crop));
        Ok(())
    }

    /// Apply the selected tool at a world position.
    ///
    /// Returns `None` if the position is outside the farm.
    pub fn interact_world(&mut self, pos: WorldPos) -> Option<ActionOutcome> {
        let coord = self.grid.world_to_grid(pos)?;
        self.interact_at(coord)
    }

    /// Apply the selected tool to a cell.
    ///
    /// Returns `None` if the coordinate is outside the farm.
    pub fn interact_at(&mut self, coord: GridCoord) -> Option<ActionOutcome> {
        let light = self.light_level();
        let seed_available = match self.pending_seed_item() {
            Some(seed) => self.inventory.has(seed, 1),
            None => true,
        };

        let cell = self.grid.cell_at_mut(coord)?;
        let outcome =
            self.dispatcher
                .apply_with_seeds(cell, &mut self.registry, light, seed_available);
        let (state, stage) = (cell.state(), cell.stage());

        match &outcome {
            ActionOutcome::Planted(def) => {
                if self.require_seeds && self.inventory.remove(def.seed_item, 1).is_ok() {
                    self.publish(FarmEvent::ItemRemoved {
                        item: def.seed_item,
                        quantity: 1,
                    });
                }
            },
            ActionOutcome::Harvested(harvested) => {
                self.harvests += 1;
                self.publish(FarmEvent::YieldSpawned {
                    crop: harvested.crop,
                    item: harvested.item,
                    quantity: harvested.quantity,
                    position: harvested.position,
                });
                match self.inventory.add(harvested.item, harvested.quantity) {
                    Ok(()) => self.publish(FarmEvent::ItemAdded {
                        item: harvested.item,
                        quantity: harvested.quantity,
                    }),
                    Err(e) => warn!("Harvest at {coord} left in the field: {e}"),
                }
            },
            ActionOutcome::Tilled | ActionOutcome::Watered | ActionOutcome::Rejected(_) => {},
        }

        if outcome.is_applied() {
            self.publish(FarmEvent::CellChanged { coord, state, stage });
        }
        Some(outcome)
    }

    /// Buy from the shop. Returns gold spent.
    pub fn buy(&mut self, item: ItemTypeId, quantity: u32) -> EconomyResult<u64> {
        let cost = self
            .shop
            .purchase(item, quantity, &mut self.inventory, &mut self.wallet)?;
        self.publish(FarmEvent::Purchased { item, quantity, cost });
        self.publish(FarmEvent::ItemAdded { item, quantity });
        Ok(cost)
    }

    /// Sell to the shop. Returns gold earned.
    pub fn sell(&mut self, item: ItemTypeId, quantity: u32) -> EconomyResult<u64> {
        let earned = self
            .shop
            .sell(item, quantity, &mut self.inventory, &mut self.wallet)?;
        self.publish(FarmEvent::ItemRemoved { item, quantity });
        self.publish(FarmEvent::Sold { item, quantity, earned });
        Ok(earned)
    }

    /// End the session and report totals.
    pub fn shutdown(self) -> SessionSummary {
        let summary = SessionSummary {
            day: self.clock.day(),
            hour: self.clock.hour(),
            ticks: self.ticks,
            harvests: self.harvests,
            growing: self.registry.len(),
            gold: self.wallet.balance(),
            transactions: self.shop.history().len(),
            items: self.inventory.iter().collect(),
            undelivered_events: self.events.pending_count(),
        };
        info!("Session finished: {summary}");
        summary
    }

    /// Seed item the next interaction would consume, if seeds are required.
    fn pending_seed_item(&self) -> Option<ItemTypeId> {
        if !self.require_seeds || self.dispatcher.tool() != FarmingTool::Seed {
            return None;
        }
        self.dispatcher.selected_crop().map(|def| def.seed_item)
    }

    fn publish(&self, event: FarmEvent) {
        if !self.events.publish(event) {
            debug!("Event bus full, dropping event");
        }
    }
}
