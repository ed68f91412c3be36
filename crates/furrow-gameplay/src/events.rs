//! Event bus for farm notifications.
//!
//! Replaces per-object callbacks: systems publish [`FarmEvent`]s and the
//! presentation layer (or a test) drains them once per frame.

use crossbeam_channel::{bounded, Receiver, Sender};
use furrow_common::{CropTypeId, GridCoord, ItemTypeId, WorldPos};
use serde::{Deserialize, Serialize};

use crate::clock::ClockEvent;
use crate::crops::CropState;
use crate::farming::FarmingTool;

/// Event types that can be sent through the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FarmEvent {
    /// Clock transition (sunrise, sunset, new day)
    Clock(ClockEvent),
    /// A cell's state or growth stage changed
    CellChanged {
        /// Cell coordinate
        coord: GridCoord,
        /// New state
        state: CropState,
        /// New growth stage
        stage: u32,
    },
    /// A harvest produced a yield in the world
    YieldSpawned {
        /// Crop harvested
        crop: CropTypeId,
        /// Item produced
        item: ItemTypeId,
        /// Quantity produced
        quantity: u32,
        /// World position of the harvested cell
        position: WorldPos,
    },
    /// Items entered the inventory
    ItemAdded {
        /// Item type
        item: ItemTypeId,
        /// Quantity
        quantity: u32,
    },
    /// Items left the inventory
    ItemRemoved {
        /// Item type
        item: ItemTypeId,
        /// Quantity
        quantity: u32,
    },
    /// Items bought from the shop
    Purchased {
        /// Item type
        item: ItemTypeId,
        /// Quantity
        quantity: u32,
        /// Gold paid
        cost: u64,
    },
    /// Items sold to the shop
    Sold {
        /// Item type
        item: ItemTypeId,
        /// Quantity
        quantity: u32,
        /// Gold received
        earned: u64,
    },
    /// Selected tool changed
    ToolChanged(FarmingTool),
    /// Selected seed changed
    CropSelected(Option<CropTypeId>),
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<FarmEvent>,
    /// Receiver for collecting events
    receiver: Receiver<FarmEvent>,
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self { sender, receiver }
    }

    /// Publishes an event to the bus.
    ///
    /// Returns false if the bus was full and the event was dropped.
    pub fn publish(&self, event: FarmEvent) -> bool {
        self.sender.try_send(event).is_ok()
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<FarmEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(8);
        assert!(bus.publish(FarmEvent::Clock(ClockEvent::Sunrise)));
        assert!(bus.publish(FarmEvent::ToolChanged(FarmingTool::Hoe)));
        assert_eq!(bus.pending_count(), 2);

        let events = bus.drain();
        assert_eq!(
            events,
            vec![
                FarmEvent::Clock(ClockEvent::Sunrise),
                FarmEvent::ToolChanged(FarmingTool::Hoe)
            ]
        );
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_full_bus_drops() {
        let bus = EventBus::new(1);
        assert!(bus.publish(FarmEvent::Clock(ClockEvent::Sunset)));
        assert!(!bus.publish(FarmEvent::Clock(ClockEvent::Sunrise)));
        assert_eq!(bus.drain().len(), 1);
    }

    #[test]
    fn test_zero_capacity_still_buffers_one() {
        let bus = EventBus::new(0);
        assert!(bus.publish(FarmEvent::CropSelected(None)));
        assert_eq!(bus.pending_count(), 1);
    }
}
