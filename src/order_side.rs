//! One side of the book: price levels in priority order.
//!
//! Levels are kept in a `BTreeMap` keyed by price; bids take their best
//! from the top of the map, asks from the bottom. A level is dropped the
//! instant its last order leaves.

use std::collections::BTreeMap;
use std::fmt;

use crate::math::math::{safe_add, safe_sub};
use crate::order_queue::OrderQueue;
use crate::{LevelSummary, Order, OrderId, Price, Quantity, Side};

#[derive(Debug)]
pub(crate) struct OrderSide {
    levels: BTreeMap<Price, OrderQueue>,
    /// Sum of remaining quantities across all levels.
    pub volume: Quantity,
    side: Side,
}

impl OrderSide {
    pub fn new(side: Side) -> OrderSide {
        OrderSide { levels: BTreeMap::new(), volume: 0, side }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Appends an order to the tail of its price level, creating the
    /// level if needed.
    pub fn append(&mut self, order: Order) {
        let quantity = order.quantity;
        let queue = self.levels.entry(order.price).or_insert_with(|| OrderQueue::new(order.price));
        queue.append(order);
        self.volume = safe_add(self.volume, quantity);
    }

    /// Unlinks an order from its level, dropping the level if it became
    /// empty. Returns the removed order.
    pub fn remove(&mut self, id: OrderId, price: Price) -> Option<Order> {
        let queue = self.levels.get_mut(&price)?;
        let order = queue.remove(id)?;
        if queue.is_empty() {
            self.levels.remove(&price);
        }
        self.volume = safe_sub(self.volume, order.quantity);
        Some(order)
    }

    /// Best price on this side: highest bid, lowest ask.
    pub fn best_price(&self) -> Option<Price> {
        match self.side {
            Side::Buy => self.levels.last_key_value().map(|(p, _)| *p),
            Side::Sell => self.levels.first_key_value().map(|(p, _)| *p),
        }
    }

    pub fn level(&self, price: Price) -> Option<&OrderQueue> {
        self.levels.get(&price)
    }

    pub fn level_mut(&mut self, price: Price) -> Option<&mut OrderQueue> {
        self.levels.get_mut(&price)
    }

    /// Drops the level at `price` if it holds no orders.
    pub fn remove_level_if_empty(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(|q| q.is_empty()) {
            self.levels.remove(&price);
        }
    }

    pub(crate) fn reduce_volume(&mut self, qty: Quantity) {
        self.volume = safe_sub(self.volume, qty);
    }

    /// Top-`depth` levels in priority order, or all levels for depth 0.
    pub fn depth(&self, depth: usize) -> Vec<LevelSummary> {
        let take = if depth == 0 { self.levels.len() } else { depth };
        let summarize = |(price, queue): (&Price, &OrderQueue)| LevelSummary {
            price: *price,
            total: queue.volume,
            num_orders: queue.len(),
        };
        match self.side {
            Side::Buy => self.levels.iter().rev().take(take).map(summarize).collect(),
            Side::Sell => self.levels.iter().take(take).map(summarize).collect(),
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Both sides render top-down: asks worst-to-best, bids best-to-worst.
        for (price, queue) in self.levels.iter().rev() {
            writeln!(f, "{} -> {}", price, queue.volume)?;
        }
        Ok(())
    }
}
