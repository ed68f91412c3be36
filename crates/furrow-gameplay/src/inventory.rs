//! Inventory system.

use std::collections::BTreeMap;

use furrow_common::ItemTypeId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inventory error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// Not enough items
    #[error("Not enough items: need {needed}, have {have}")]
    NotEnough {
        /// Amount needed
        needed: u32,
        /// Amount available
        have: u32,
    },
    /// Inventory full
    #[error("Inventory full: capacity {capacity}")]
    Full {
        /// Inventory capacity
        capacity: u32,
    },
}

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// An inventory container.
///
/// Holds a quantity per item type; `capacity` bounds the number of distinct
/// item types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    /// Items and their quantities
    items: BTreeMap<ItemTypeId, u32>,
    /// Maximum unique item types
    capacity: u32,
}

impl Inventory {
    /// Creates a new inventory with the given capacity.
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        Self {
            items: BTreeMap::new(),
            capacity,
        }
    }

    /// Returns the number of unique item types.
    #[must_use]
    pub fn slot_count(&self) -> u32 {
        self.items.len() as u32
    }

    /// Returns the capacity.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the count of a specific item.
    #[must_use]
    pub fn count(&self, item: ItemTypeId) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    /// Checks if the inventory contains at least the given amount.
    #[must_use]
    pub fn has(&self, item: ItemTypeId, amount: u32) -> bool {
        self.count(item) >= amount
    }

    /// Checks if `amount` of `item` would fit.
    #[must_use]
    pub fn can_add(&self, item: ItemTypeId, amount: u32) -> bool {
        amount == 0 || self.items.contains_key(&item) || self.slot_count() < self.capacity
    }

    /// Adds items to the inventory.
    pub fn add(&mut self, item: ItemTypeId, amount: u32) -> InventoryResult<()> {
        if amount == 0 {
            return Ok(());
        }
        if !self.can_add(item, amount) {
            return Err(InventoryError::Full {
                capacity: self.capacity,
            });
        }
        let slot = self.items.entry(item).or_insert(0);
        *slot = slot.saturating_add(amount);
        Ok(())
    }

    /// Removes items from the inventory.
    pub fn remove(&mut self, item: ItemTypeId, amount: u32) -> InventoryResult<()> {
        let current = self.count(item);
        if current < amount {
            return Err(InventoryError::NotEnough {
                needed: amount,
                have: current,
            });
        }
        if current == amount {
            self.items.remove(&item);
        } else {
            self.items.insert(item, current - amount);
        }
        Ok(())
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns an iterator over all items, ordered by item id.
    pub fn iter(&self) -> impl Iterator<Item = (ItemTypeId, u32)> + '_ {
        self.items.iter().map(|(&id, &count)| (id, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove() {
        let mut inv = Inventory::new(10);
        let item = ItemTypeId::new(1);

        assert!(inv.add(item, 5).is_ok());
        assert_eq!(inv.count(item), 5);
        assert!(inv.remove(item, 3).is_ok());
        assert_eq!(inv.count(item), 2);
        assert!(inv.remove(item, 2).is_ok());
        assert_eq!(inv.slot_count(), 0);
    }

    #[test]
    fn test_remove_more_than_held() {
        let mut inv = Inventory::new(10);
        let item = ItemTypeId::new(1);
        inv.add(item, 1).expect("room");
        assert_eq!(
            inv.remove(item, 2),
            Err(InventoryError::NotEnough { needed: 2, have: 1 })
        );
        assert_eq!(inv.count(item), 1);
    }

    #[test]
    fn test_capacity_limits_distinct_items() {
        let mut inv = Inventory::new(1);
        inv.add(ItemTypeId::new(1), 1).expect("room");
        // Existing item type still stacks
        assert!(inv.add(ItemTypeId::new(1), 50).is_ok());
        assert_eq!(
            inv.add(ItemTypeId::new(2), 1),
            Err(InventoryError::Full { capacity: 1 })
        );
        // Zero is always accepted and takes no slot
        assert!(inv.add(ItemTypeId::new(3), 0).is_ok());
        assert_eq!(inv.slot_count(), 1);
    }

    #[test]
    fn test_iter_ordered_and_clear() {
        let mut inv = Inventory::new(5);
        inv.add(ItemTypeId::new(7), 1).expect("room");
        inv.add(ItemTypeId::new(2), 4).expect("room");
        let items: Vec<_> = inv.iter().collect();
        assert_eq!(items, vec![(ItemTypeId::new(2), 4), (ItemTypeId::new(7), 1)]);
        inv.clear();
        assert!(!inv.has(ItemTypeId::new(2), 1));
    }
}
