//! Core order book for a single symbol.
//!
//! The book owns every resting order: a price-sorted level map per side
//! plus a locator index keyed by order id, so a cancel unlinks its order
//! in O(1) without scanning the level. The book is not thread-safe; the
//! owning engine confines all mutation to the matcher thread (cancels
//! included, behind the engine's lock).

use rustc_hash::{FxBuildHasher, FxHashMap};
use std::fmt;

use crate::order_side::OrderSide;
use crate::{LevelSummary, Order, OrderId, OrderType, Price, Quantity, Side};

/// Where a resting order lives. The order id itself is the stable handle
/// into the level's linked sequence.
#[derive(Debug, Clone, Copy)]
struct Locator {
    side: Side,
    price: Price,
}

pub struct OrderBook {
    bids: OrderSide,
    asks: OrderSide,
    locators: FxHashMap<OrderId, Locator>,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            bids: OrderSide::new(Side::Buy),
            asks: OrderSide::new(Side::Sell),
            locators: FxHashMap::with_capacity_and_hasher(1024, FxBuildHasher),
        }
    }

    /// Rests an order at the tail of its `(side, price)` level, creating
    /// the level if needed, and indexes it for O(1) cancellation.
    ///
    /// Returns `false` without touching the book when the order is
    /// malformed: non-positive quantity, or a limit order at a
    /// non-positive price. Market orders never reach this path; the
    /// matcher consumes them entirely.
    pub fn add_order(&mut self, order: Order) -> bool {
        if order.order_type == OrderType::Limit && order.price <= 0 {
            log::debug!("REJECT id={} invalid price={}", order.order_id, order.price);
            return false;
        }
        if order.quantity <= 0 {
            log::debug!("REJECT id={} invalid quantity={}", order.order_id, order.quantity);
            return false;
        }

        // Ingress owns order-id uniqueness; a duplicate here corrupts the
        // locator index.
        debug_assert!(
            !self.locators.contains_key(&order.order_id),
            "duplicate order id {}",
            order.order_id
        );

        let locator = Locator { side: order.side, price: order.price };
        log::debug!(
            "ADD id={} side={:?} price={} qty={}",
            order.order_id,
            order.side,
            order.price,
            order.quantity
        );
        self.locators.insert(order.order_id, locator);
        self.side_mut(order.side).append(order);
        true
    }

    /// Cancels a resting order by id. Returns `false` when no such order
    /// rests. Removal from the level and from the locator index is a
    /// single step; the emptied level is dropped immediately.
    pub fn cancel_order(&mut self, id: OrderId) -> bool {
        let Some(locator) = self.locators.remove(&id) else {
            return false;
        };

        log::debug!("CANCEL id={}", id);
        let removed = self.side_mut(locator.side).remove(id, locator.price);
        debug_assert!(removed.is_some(), "locator for {} pointed at a missing order", id);
        removed.is_some()
    }

    /// Matcher-only: pops the head of the `(side, price)` level, but only
    /// if the head's id equals `expected_id`. No-op otherwise. Drops the
    /// level if it became empty.
    pub(crate) fn erase_front_at_level(&mut self, side: Side, price: Price, expected_id: OrderId) {
        let book_side = self.side_mut(side);
        let Some(queue) = book_side.level_mut(price) else {
            return;
        };
        if queue.front().map(|o| o.order_id) != Some(expected_id) {
            return;
        }
        let order = queue.pop_front().expect("non-empty level lost its head");
        book_side.reduce_volume(order.quantity);
        book_side.remove_level_if_empty(price);
        self.locators.remove(&expected_id);
        log::debug!("ERASE_FRONT id={} price={}", expected_id, price);
    }

    /// Matcher-only: id and remaining quantity of the head order at the
    /// `(side, price)` level.
    pub(crate) fn front_at(&self, side: Side, price: Price) -> Option<(OrderId, Quantity)> {
        self.side(side).level(price)?.front().map(|o| (o.order_id, o.quantity))
    }

    /// Matcher-only: applies a partial fill to the head order of the
    /// `(side, price)` level.
    pub(crate) fn reduce_front(&mut self, side: Side, price: Price, qty: Quantity) {
        let book_side = self.side_mut(side);
        if let Some(queue) = book_side.level_mut(price) {
            queue.reduce_front(qty);
            book_side.reduce_volume(qty);
        }
    }

    /// Highest resting buy price. O(1).
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Lowest resting sell price. O(1).
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Top-`depth` bid levels, best first; all levels for depth 0.
    pub fn snapshot_bids(&self, depth: usize) -> Vec<LevelSummary> {
        self.bids.depth(depth)
    }

    /// Top-`depth` ask levels, best first; all levels for depth 0.
    pub fn snapshot_asks(&self, depth: usize) -> Vec<LevelSummary> {
        self.asks.depth(depth)
    }

    /// True if an order with this id is resting.
    pub fn contains(&self, id: OrderId) -> bool {
        self.locators.contains_key(&id)
    }

    /// Number of resting orders across both sides.
    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }

    pub(crate) fn side(&self, side: Side) -> &OrderSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut OrderSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }
}

impl fmt::Display for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.asks)?;
        writeln!(f, "------------------------------------")?;
        write!(f, "{}", self.bids)
    }
}
