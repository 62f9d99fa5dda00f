//! Common enumerations used throughout the matching engine.
//!
//! This module defines the order sides and order types understood by the
//! matcher. Richer order semantics (time-in-force, contingent orders) are
//! intentionally absent; the engine matches plain limit and market orders.

use serde::{Deserialize, Serialize};

/// Represents the side of an order: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy side (bids)
    Buy,
    /// Sell side (asks)
    Sell,
}

impl Side {
    /// The side an incoming order matches against.
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Represents the type of order being placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// A limit order that rests on the book until matched or canceled.
    Limit,
    /// A market order that matches immediately and never rests.
    Market,
}
