//! Core scalar types and records shared by every component.
//!
//! Prices are integer ticks and quantities integer lots, both signed so
//! that market orders can be carried as limit orders at sentinel prices
//! ([`MARKET_BUY_PRICE`] / [`MARKET_SELL_PRICE`]). Timestamps are
//! monotonic-clock nanoseconds stamped by the matcher, not the client.

use serde::{Deserialize, Serialize};

use crate::{OrderType, Side};

/// Globally unique order identifier, assigned by the ingress layer.
pub type OrderId = u64;
/// Identifier of the instrument an order targets.
pub type SymbolId = u32;
/// Price in ticks.
pub type Price = i64;
/// Quantity in lots.
pub type Quantity = i64;
/// Monotonic-clock nanoseconds.
pub type Timestamp = u64;

/// Sentinel price carried by market buy orders: crosses any ask.
pub const MARKET_BUY_PRICE: Price = Price::MAX;
/// Sentinel price carried by market sell orders: crosses any bid.
pub const MARKET_SELL_PRICE: Price = Price::MIN;

/// An order command. Immutable on submit; once resting, `quantity` is the
/// mutable residue that decrements as the order fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub symbol_id: SymbolId,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Price,
    pub quantity: Quantity,
    /// Arrival timestamp, overwritten by the matcher at entry.
    pub ts: Timestamp,
}

impl Order {
    /// Creates a limit order resting candidate at `price`.
    pub fn limit(
        order_id: OrderId,
        symbol_id: SymbolId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self { order_id, symbol_id, side, order_type: OrderType::Limit, price, quantity, ts: 0 }
    }

    /// Creates a market order. The sentinel price makes it cross any
    /// contra level; the residue never rests.
    pub fn market(order_id: OrderId, symbol_id: SymbolId, side: Side, quantity: Quantity) -> Self {
        let price = match side {
            Side::Buy => MARKET_BUY_PRICE,
            Side::Sell => MARKET_SELL_PRICE,
        };
        Self { order_id, symbol_id, side, order_type: OrderType::Market, price, quantity, ts: 0 }
    }
}

/// Immutable record of a single fill. The price is always the maker's
/// resting price; `ts` is the taker's arrival timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub maker_id: OrderId,
    pub taker_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
    pub ts: Timestamp,
}

/// One row of an L2 snapshot: a price level aggregated over its resting
/// orders, best levels first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub price: Price,
    pub total: Quantity,
    pub num_orders: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_order_sentinel_prices() {
        let buy = Order::market(1, 1, Side::Buy, 10);
        assert_eq!(buy.price, MARKET_BUY_PRICE);
        assert_eq!(buy.order_type, OrderType::Market);

        let sell = Order::market(2, 1, Side::Sell, 10);
        assert_eq!(sell.price, MARKET_SELL_PRICE);
    }

    #[test]
    fn test_limit_order_fields() {
        let o = Order::limit(7, 3, Side::Sell, 101, 4);
        assert_eq!(o.order_id, 7);
        assert_eq!(o.symbol_id, 3);
        assert_eq!(o.side, Side::Sell);
        assert_eq!(o.order_type, OrderType::Limit);
        assert_eq!(o.price, 101);
        assert_eq!(o.quantity, 4);
        assert_eq!(o.ts, 0);
    }
}
