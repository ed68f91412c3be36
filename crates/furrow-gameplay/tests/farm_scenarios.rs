//! End-to-end farming scenarios through the public API.

use std::sync::Arc;

use furrow_common::{CropTypeId, GridCoord, ItemTypeId};
use furrow_gameplay::prelude::*;
use glam::Vec2;
use proptest::prelude::*;

const BEAN: CropTypeId = CropTypeId::new(42);
const BEAN_ITEM: ItemTypeId = ItemTypeId::new(420);
const BEAN_SEED: ItemTypeId = ItemTypeId::new(421);

fn bean(stage_count: u32, stage_duration: f32) -> CropDefinition {
    CropDefinition::builder(BEAN, "Bean")
        .stages(stage_count, stage_duration)
        .min_light(0.0)
        .harvest(BEAN_ITEM, 2)
        .seed(BEAN_SEED)
        .build()
        .expect("valid crop")
}

fn one_cell_farm(crop: CropDefinition) -> FarmSimulation {
    let mut config = FarmConfig::default();
    config.crops = vec![crop];
    config.grid.width = 1;
    config.grid.height = 1;
    config.growth_update_interval = 0.0;
    config.day_length_seconds = 2400.0;
    FarmSimulation::new(config).expect("valid config")
}

#[test]
fn two_stage_crop_grows_to_ready_in_two_ticks() {
    let mut sim = one_cell_farm(bean(2, 1.0));
    let coord = GridCoord::new(0, 0);

    sim.select_crop(Some(BEAN)).expect("known crop");
    for tool in [FarmingTool::Hoe, FarmingTool::Seed, FarmingTool::Water] {
        sim.set_tool(tool);
        let outcome = sim.interact_at(coord).expect("in bounds");
        assert!(outcome.is_applied(), "{tool:?} was rejected: {outcome:?}");
    }
    assert_eq!(sim.registry().len(), 1);
    sim.drain_events();

    sim.tick(1.0);
    let cell = sim.grid().cell_at(coord).expect("cell");
    assert_eq!(cell.state(), CropState::Growing);
    assert_eq!(cell.stage(), 1);
    assert!(sim.drain_events().contains(&FarmEvent::CellChanged {
        coord,
        state: CropState::Growing,
        stage: 1,
    }));

    sim.tick(1.0);
    let cell = sim.grid().cell_at(coord).expect("cell");
    assert_eq!(cell.state(), CropState::Ready);
    assert_eq!(cell.stage(), 1);

    sim.set_tool(FarmingTool::Harvest);
    let outcome = sim.interact_world(Vec2::new(0.5, 0.5));
    assert!(matches!(outcome, Some(ActionOutcome::Harvested(_))));
    assert_eq!(sim.inventory().count(BEAN_ITEM), 2);
    assert!(sim.registry().is_empty());

    let events = sim.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, FarmEvent::YieldSpawned { item, quantity: 2, .. } if *item == BEAN_ITEM)));
    assert!(events.contains(&FarmEvent::ItemAdded {
        item: BEAN_ITEM,
        quantity: 2
    }));
}

#[test]
fn planting_untilled_ground_is_rejected() {
    let mut sim = one_cell_farm(bean(2, 1.0));
    let coord = GridCoord::new(0, 0);
    sim.select_crop(Some(BEAN)).expect("known crop");
    sim.set_tool(FarmingTool::Seed);

    assert_eq!(
        sim.interact_at(coord),
        Some(ActionOutcome::Rejected(RejectReason::InvalidState))
    );
    assert_eq!(
        sim.grid().cell_at(coord).map(CropCell::state),
        Some(CropState::Empty)
    );
    assert!(sim.registry().is_empty());
}

#[test]
fn harvested_cell_can_be_farmed_again() {
    let def = Arc::new(bean(1, 5.0));
    let mut cell = CropCell::new(GridCoord::new(3, 1), Vec2::new(3.5, 1.5));

    assert!(cell.till());
    assert!(cell.plant(&def));
    assert!(cell.water());
    assert_eq!(cell.grow(5.0, true), GrowthOutcome::Ready);
    assert!(cell.harvest().is_some());

    assert_eq!(cell.state(), CropState::Empty);
    assert!(cell.crop().is_none());
    assert!(!cell.is_watered());
    assert_eq!(cell.stage(), 0);

    assert!(cell.till());
    assert!(cell.plant(&def));
    assert_eq!(cell.state(), CropState::Planted);
    assert!(cell.growth_elapsed().abs() < f64::EPSILON);
}

#[test]
fn crops_sleep_through_the_night() {
    let mut config = FarmConfig::default();
    config.grid.width = 1;
    config.grid.height = 1;
    config.growth_update_interval = 0.0;
    config.start_hour = 17.0;
    let mut sim = FarmSimulation::new(config).expect("valid config");
    let coord = GridCoord::new(0, 0);

    sim.select_crop(Some(crop_types::CARROT)).expect("known crop");
    for tool in [FarmingTool::Hoe, FarmingTool::Seed, FarmingTool::Water] {
        sim.set_tool(tool);
        sim.interact_at(coord);
    }

    // 17:00 -> 19:00 at 10 real seconds per hour
    for _ in 0..20 {
        sim.tick(1.0);
    }
    assert!(!sim.clock().is_growing_hour());
    let before = sim.grid().cell_at(coord).map(CropCell::growth_elapsed);
    sim.tick(1.0);
    let after = sim.grid().cell_at(coord).map(CropCell::growth_elapsed);
    assert!(!sim.clock().is_day());
    assert_eq!(before, after);
}

#[test]
fn seeds_bought_and_harvest_sold() {
    let mut config = FarmConfig::default();
    config.crops = vec![bean(1, 1.0)];
    config.grid.width = 1;
    config.grid.height = 1;
    config.growth_update_interval = 0.0;
    config.require_seeds = true;
    config.starting_gold = 10;
    config.items = vec![
        ItemDefinition {
            id: BEAN_SEED,
            name: "Bean Seeds".to_string(),
            value: 2,
            sellable: true,
        },
        ItemDefinition {
            id: BEAN_ITEM,
            name: "Bean".to_string(),
            value: 8,
            sellable: true,
        },
    ];
    config.shop = vec![ShopListing {
        item: BEAN_SEED,
        price: 3,
        stock: Some(1),
    }];
    let mut sim = FarmSimulation::new(config).expect("valid config");
    let coord = GridCoord::new(0, 0);

    assert_eq!(sim.buy(BEAN_SEED, 1), Ok(3));
    assert!(matches!(
        sim.buy(BEAN_SEED, 1),
        Err(EconomyError::OutOfStock { .. })
    ));

    sim.select_crop(Some(BEAN)).expect("known crop");
    for tool in [FarmingTool::Hoe, FarmingTool::Seed, FarmingTool::Water] {
        sim.set_tool(tool);
        assert!(sim.interact_at(coord).is_some_and(|o| o.is_applied()));
    }
    assert_eq!(sim.inventory().count(BEAN_SEED), 0);

    sim.tick(1.0);
    sim.set_tool(FarmingTool::Harvest);
    sim.interact_at(coord);
    assert_eq!(sim.inventory().count(BEAN_ITEM), 2);
    assert_eq!(sim.harvests(), 1);

    assert_eq!(sim.sell(BEAN_ITEM, 2), Ok(8));
    assert_eq!(sim.wallet().balance(), 15);

    let events = sim.drain_events();
    assert!(events.contains(&FarmEvent::Purchased {
        item: BEAN_SEED,
        quantity: 1,
        cost: 3
    }));
    assert!(events.contains(&FarmEvent::Sold {
        item: BEAN_ITEM,
        quantity: 2,
        earned: 8
    }));

    let summary = sim.shutdown();
    assert_eq!(summary.gold, 15);
    assert_eq!(summary.harvests, 1);
    assert!(summary.items.is_empty());
}

#[derive(Debug, Clone, Copy)]
enum CellOp {
    Till,
    Water,
    Plant,
    Grow(u8, bool),
    Harvest,
    Reset,
}

fn cell_op() -> impl Strategy<Value = CellOp> {
    prop_oneof![
        Just(CellOp::Till),
        Just(CellOp::Water),
        Just(CellOp::Plant),
        (0u8..12, any::<bool>()).prop_map(|(t, lit)| CellOp::Grow(t, lit)),
        Just(CellOp::Harvest),
        Just(CellOp::Reset),
    ]
}

proptest! {
    #[test]
    fn crop_bound_exactly_when_state_has_crop(ops in prop::collection::vec(cell_op(), 0..64)) {
        let def = Arc::new(bean(3, 2.0));
        let mut cell = CropCell::new(GridCoord::new(0, 0), Vec2::ZERO);

        for op in ops {
            match op {
                CellOp::Till => { cell.till(); },
                CellOp::Water => { cell.water(); },
                CellOp::Plant => { cell.plant(&def); },
                CellOp::Grow(t, lit) => {
                    cell.grow(f64::from(t) * 0.5, lit);
                },
                CellOp::Harvest => { cell.harvest(); },
                CellOp::Reset => cell.reset(),
            }
            prop_assert_eq!(cell.crop().is_some(), cell.state().has_crop());
            prop_assert!(cell.stage() <= def.last_stage());
            if cell.state() == CropState::Ready {
                prop_assert_eq!(cell.stage(), def.last_stage());
            }
        }
    }

    #[test]
    fn growth_independent_of_tick_size(
        tenths in prop::collection::vec(1u8..=30, 1..40),
        stage_duration in prop::sample::select(vec![0.3f32, 0.7, 1.0, 1.1]),
    ) {
        let def = Arc::new(bean(4, stage_duration));
        let mut fine = CropCell::new(GridCoord::new(0, 0), Vec2::ZERO);
        let mut coarse = fine.clone();
        for cell in [&mut fine, &mut coarse] {
            cell.till();
            cell.plant(&def);
            cell.water();
        }

        // Frame deltas arrive as f32 from the host
        let ticks: Vec<f32> = tenths.iter().map(|&k| f32::from(k) * 0.1).collect();
        for &dt in &ticks {
            fine.grow(f64::from(dt), true);
        }
        let total: f64 = ticks.iter().map(|&dt| f64::from(dt)).sum();
        coarse.grow(f64::from(total as f32), true);

        prop_assert_eq!(fine.state(), coarse.state());
        prop_assert_eq!(fine.stage(), coarse.stage());
    }

    #[test]
    fn dry_soil_never_grows(steps in prop::collection::vec(0.0f64..50.0, 1..32)) {
        let def = Arc::new(bean(2, 1.0));
        let mut cell = CropCell::new(GridCoord::new(0, 0), Vec2::ZERO);
        cell.till();
        cell.plant(&def);

        for dt in steps {
            prop_assert_eq!(cell.grow(dt, true), GrowthOutcome::Dormant);
        }
        prop_assert_eq!(cell.state(), CropState::Planted);
        prop_assert!(cell.growth_elapsed().abs() < f64::EPSILON);
    }
}
