//! Economy: gold wallet, item values and the seed shop.

use ahash::AHashMap;
use furrow_common::ItemTypeId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::inventory::{Inventory, InventoryError};

/// Economy error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EconomyError {
    /// Insufficient funds
    #[error("Insufficient funds: need {needed}, have {have}")]
    InsufficientFunds {
        /// Amount needed
        needed: u64,
        /// Amount available
        have: u64,
    },
    /// Shop does not list the item
    #[error("Item not sold here: {0:?}")]
    NotListed(ItemTypeId),
    /// Item has no definition
    #[error("Unknown item: {0:?}")]
    UnknownItem(ItemTypeId),
    /// Item cannot be sold
    #[error("Item cannot be sold: {0:?}")]
    NotSellable(ItemTypeId),
    /// Not enough stock
    #[error("Out of stock: requested {requested}, available {available}")]
    OutOfStock {
        /// Amount requested
        requested: u32,
        /// Amount in stock
        available: u32,
    },
    /// Invalid quantity
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    /// Inventory rejected the transfer
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;

/// A wallet holding gold.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wallet {
    gold: u64,
}

impl Wallet {
    /// Creates a wallet with a starting balance.
    #[must_use]
    pub const fn new(initial_gold: u64) -> Self {
        Self { gold: initial_gold }
    }

    /// Returns the gold balance.
    #[must_use]
    pub const fn balance(&self) -> u64 {
        self.gold
    }

    /// Adds gold to the wallet.
    pub fn earn(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Removes gold from the wallet.
    pub fn spend(&mut self, amount: u64) -> EconomyResult<()> {
        if self.gold < amount {
            return Err(EconomyError::InsufficientFunds {
                needed: amount,
                have: self.gold,
            });
        }
        self.gold -= amount;
        Ok(())
    }
}

/// Static data about an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Item type
    pub id: ItemTypeId,
    /// Display name
    pub name: String,
    /// Base value in gold
    pub value: u64,
    /// Whether the shop buys this item
    #[serde(default = "default_sellable")]
    pub sellable: bool,
}

const fn default_sellable() -> bool {
    true
}

/// Something the shop offers for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopListing {
    /// Item offered
    pub item: ItemTypeId,
    /// Price per unit in gold
    pub price: u64,
    /// Remaining stock (`None` = unlimited)
    #[serde(default)]
    pub stock: Option<u32>,
}

/// A record of a completed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Item type involved
    pub item: ItemTypeId,
    /// Quantity bought or sold
    pub quantity: u32,
    /// Total gold paid/received
    pub total_price: u64,
    /// Whether this was a purchase (true) or sale (false)
    pub is_purchase: bool,
}

/// Shop that sells listed items and buys anything sellable at half value.
#[derive(Debug, Clone, Default)]
pub struct Shop {
    items: AHashMap<ItemTypeId, ItemDefinition>,
    listings: Vec<ShopListing>,
    history: Vec<Transaction>,
}

impl Shop {
    /// Creates a shop that knows the given items.
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = ItemDefinition>) -> Self {
        Self {
            items: items.into_iter().map(|def| (def.id, def)).collect(),
            listings: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Offers an item for sale. Replaces an existing listing for the same item.
    pub fn add_listing(&mut self, listing: ShopListing) {
        match self.listings.iter_mut().find(|l| l.item == listing.item) {
            Some(existing) => *existing = listing,
            None => self.listings.push(listing),
        }
    }

    /// Returns the listing for an item.
    #[must_use]
    pub fn listing(&self, item: ItemTypeId) -> Option<&ShopListing> {
        self.listings.iter().find(|l| l.item == item)
    }

    /// Returns an item's definition.
    #[must_use]
    pub fn item(&self, item: ItemTypeId) -> Option<&ItemDefinition> {
        self.items.get(&item)
    }

    /// Returns the transaction history.
    #[must_use]
    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    /// Gold the shop pays for `quantity` of an item.
    pub fn sell_price(&self, item: ItemTypeId, quantity: u32) -> EconomyResult<u64> {
        let def = self.items.get(&item).ok_or(EconomyError::UnknownItem(item))?;
        if !def.sellable {
            return Err(EconomyError::NotSellable(item));
        }
        Ok(def.value.saturating_mul(u64::from(quantity)) / 2)
    }

    /// Buys `quantity` of a listed item. Returns the gold spent.
    ///
    /// Gold is refunded if the inventory cannot take the items.
    pub fn purchase(
        &mut self,
        item: ItemTypeId,
        quantity: u32,
        inventory: &mut Inventory,
        wallet: &mut Wallet,
    ) -> EconomyResult<u64> {
        if quantity == 0 {
            return Err(EconomyError::InvalidQuantity(quantity));
        }
        let listing = self
            .listings
            .iter_mut()
            .find(|l| l.item == item)
            .ok_or(EconomyError::NotListed(item))?;
        if let Some(available) = listing.stock {
            if available < quantity {
                return Err(EconomyError::OutOfStock {
                    requested: quantity,
                    available,
                });
            }
        }

        let cost = listing.price.saturating_mul(u64::from(quantity));
        wallet.spend(cost)?;
        if let Err(e) = inventory.add(item, quantity) {
            warn!("Purchase of {quantity} x {item:?} failed, refunding {cost} gold: {e}");
            wallet.earn(cost);
            return Err(e.into());
        }
        if let Some(stock) = listing.stock.as_mut() {
            *stock -= quantity;
        }

        debug!("Bought {quantity} x {item:?} for {cost} gold");
        self.history.push(Transaction {
            item,
            quantity,
            total_price: cost,
            is_purchase: true,
        });
        Ok(cost)
    }

    /// Sells `quantity` of an item from the inventory. Returns the gold earned.
    pub fn sell(
        &mut self,
        item: ItemTypeId,
        quantity: u32,
        inventory: &mut Inventory,
        wallet: &mut Wallet,
    ) -> EconomyResult<u64> {
        if quantity == 0 {
            return Err(EconomyError::InvalidQuantity(quantity));
        }
        let earned = self.sell_price(item, quantity)?;
        inventory.remove(item, quantity)?;
        wallet.earn(earned);

        debug!("Sold {quantity} x {item:?} for {earned} gold");
        self.history.push(Transaction {
            item,
            quantity,
            total_price: earned,
            is_purchase: false,
        });
        Ok(earned)
    }
}
