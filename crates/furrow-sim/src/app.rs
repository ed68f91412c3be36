//! Application lifecycle management.
//!
//! Runs a headless farming session: a scripted farmer works the whole grid
//! every morning while the simulation is fed synthetic frame times.

use anyhow::{Context, Result};
use furrow_common::{CropTypeId, GridCoord, ItemTypeId};
use furrow_gameplay::{
    ActionOutcome, ClockEvent, CropState, FarmConfig, FarmEvent, FarmSimulation, FarmingTool,
    SessionSummary,
};
use tracing::{debug, info, warn};

use crate::timing::FixedStep;

/// How long to run and how finely to step.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// In-game days to simulate
    pub days: u32,
    /// Synthetic frame time in real seconds
    pub frame_dt: f32,
    /// Fixed simulation step in real seconds
    pub step: f32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            days: 3,
            frame_dt: 1.0 / 20.0,
            step: 1.0 / 10.0,
        }
    }
}

/// Scripted player that tends every cell.
#[derive(Debug, Default)]
struct Farmer {
    /// Index into the crop rotation
    rotation: usize,
}

impl Farmer {
    /// Work each cell one step further along its cycle.
    fn morning_round(&mut self, sim: &mut FarmSimulation, crops: &[CropTypeId]) {
        let cells: Vec<(GridCoord, CropState, bool)> = sim
            .grid()
            .iter()
            .map(|c| (c.coord(), c.state(), c.is_watered()))
            .collect();

        for (coord, state, watered) in cells {
            match state {
                CropState::Empty => {
                    Self::use_tool(sim, FarmingTool::Hoe, coord);
                },
                CropState::Tilled => {
                    if self.plant(sim, crops, coord) {
                        Self::use_tool(sim, FarmingTool::Water, coord);
                    }
                },
                CropState::Planted | CropState::Growing if !watered => {
                    Self::use_tool(sim, FarmingTool::Water, coord);
                },
                CropState::Ready => {
                    Self::use_tool(sim, FarmingTool::Harvest, coord);
                },
                CropState::Planted | CropState::Growing => {},
            }
        }
    }

    fn plant(&mut self, sim: &mut FarmSimulation, crops: &[CropTypeId], coord: GridCoord) -> bool {
        if crops.is_empty() {
            return false;
        }
        let crop = crops[self.rotation % crops.len()];
        self.rotation += 1;

        if let Err(e) = sim.select_crop(Some(crop)) {
            warn!("Cannot select {crop:?}: {e}");
            return false;
        }
        if let Some(seed) = sim.catalog().get(crop).map(|def| def.seed_item) {
            if !sim.inventory().has(seed, 1) {
                if let Err(e) = sim.buy(seed, 1) {
                    debug!("Could not buy seed for {crop:?}: {e}");
                }
            }
        }
        Self::use_tool(sim, FarmingTool::Seed, coord)
    }

    fn use_tool(sim: &mut FarmSimulation, tool: FarmingTool, coord: GridCoord) -> bool {
        sim.set_tool(tool);
        match sim.interact_at(coord) {
            Some(ActionOutcome::Rejected(reason)) => {
                debug!("{tool:?} at {coord} rejected: {reason:?}");
                false
            },
            Some(_) => true,
            None => false,
        }
    }

    /// Sell every harvested crop in the inventory.
    fn sell_produce(sim: &mut FarmSimulation, produce: &[ItemTypeId]) {
        for &item in produce {
            let count = sim.inventory().count(item);
            if count == 0 {
                continue;
            }
            match sim.sell(item, count) {
                Ok(earned) => info!("Sold {count} x {item:?} for {earned} gold"),
                Err(e) => warn!("Could not sell {item:?}: {e}"),
            }
        }
    }
}

/// Run a session and return its summary.
pub fn run(config: FarmConfig, options: RunOptions) -> Result<SessionSummary> {
    let mut sim = FarmSimulation::new(config).context("Failed to build farm")?;
    let mut timing = FixedStep::new(options.step);
    let mut farmer = Farmer::default();

    let mut crops: Vec<CropTypeId> = sim.catalog().iter().map(|def| def.id).collect();
    crops.sort();
    let mut produce: Vec<ItemTypeId> = sim.catalog().iter().map(|def| def.yield_item).collect();
    produce.sort();
    produce.dedup();

    let last_day = sim.clock().day().saturating_add(options.days);
    info!(
        "Running {} days from day {} at {}",
        options.days,
        sim.clock().day(),
        sim.clock().format_time()
    );

    while sim.clock().day() < last_day {
        for _ in 0..timing.accumulate(options.frame_dt) {
            sim.tick(timing.step());
        }

        let mut morning = false;
        for event in sim.drain_events() {
            match event {
                FarmEvent::Clock(ClockEvent::Sunrise) => morning = true,
                FarmEvent::Clock(ClockEvent::NewDay(day)) => {
                    info!("Day {day}: {} gold", sim.wallet().balance());
                },
                FarmEvent::YieldSpawned { item, quantity, .. } => {
                    debug!("Harvested {quantity} x {item:?}");
                },
                _ => {},
            }
        }

        if morning {
            farmer.morning_round(&mut sim, &crops);
            Farmer::sell_produce(&mut sim, &produce);
            info!(
                "Day {} {}: {} growing, {} ready",
                sim.clock().day(),
                sim.clock().format_time(),
                sim.registry().len(),
                sim.grid().count_in_state(CropState::Ready)
            );
        }
    }

    sim.drain_events();
    Ok(sim.shutdown())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_harvests_fast_crops() {
        let mut config = FarmConfig::default();
        config.grid.width = 2;
        config.grid.height = 2;
        config.day_length_seconds = 24.0;
        config.growth_update_interval = 0.0;
        let options = RunOptions {
            days: 6,
            frame_dt: 0.5,
            step: 0.5,
        };

        let summary = run(config, options).expect("session runs");

        assert_eq!(summary.day, 7);
        assert!(summary.harvests > 0);
        assert_eq!(summary.undelivered_events, 0);
    }

    #[test]
    fn test_session_with_no_days() {
        let options = RunOptions {
            days: 0,
            ..RunOptions::default()
        };
        let summary = run(FarmConfig::default(), options).expect("session runs");
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.day, 1);
    }
}
