//! Price/time-priority matching.
//!
//! The matcher is a stateless transformer: given an incoming order and
//! the book, it produces trades, mutates the book, and publishes
//! lifecycle events. Fills walk the best contra level head-first (FIFO),
//! always at the maker's resting price. Market residue is discarded;
//! limit residue rests at the submitted price.

use crate::event::{EngineEvent, EventPublisher};
use crate::utils::monotonic_ns;
use crate::{Order, OrderBook, OrderType, Price, Side, Trade};

/// Marketability check: market orders always cross; a limit buy crosses
/// when its price is at or above the maker's, a limit sell at or below.
#[inline]
pub(crate) fn can_match(
    taker_side: Side,
    taker_price: Price,
    maker_price: Price,
    order_type: OrderType,
) -> bool {
    if order_type == OrderType::Market {
        return true;
    }
    match taker_side {
        Side::Buy => taker_price >= maker_price,
        Side::Sell => taker_price <= maker_price,
    }
}

/// Processes one incoming order against the book. The arrival timestamp
/// is stamped here, from the monotonic clock; client-supplied timestamps
/// are ignored.
pub(crate) fn process(
    book: &mut OrderBook,
    publisher: &EventPublisher,
    mut order: Order,
) -> Vec<Trade> {
    order.ts = monotonic_ns();

    publisher.publish(EngineEvent::Ack { order_id: order.order_id, ts: order.ts });

    // Validation failures reject without disturbing the book.
    if order.quantity <= 0 || (order.order_type == OrderType::Limit && order.price <= 0) {
        log::debug!(
            "REJECT id={} price={} qty={}",
            order.order_id,
            order.price,
            order.quantity
        );
        publisher.publish(EngineEvent::Reject { order_id: order.order_id, ts: order.ts });
        return Vec::new();
    }

    let mut trades = Vec::new();
    let contra = order.side.opposite();

    while order.quantity > 0 {
        let Some(maker_price) = book.side(contra).best_price() else {
            break;
        };
        if !can_match(order.side, order.price, maker_price, order.order_type) {
            break;
        }

        // Consume the level head-first until the taker or the level is done.
        while order.quantity > 0 {
            let Some((maker_id, maker_qty)) = book.front_at(contra, maker_price) else {
                break;
            };
            let fill_qty = order.quantity.min(maker_qty);
            let trade = Trade {
                maker_id,
                taker_id: order.order_id,
                price: maker_price,
                quantity: fill_qty,
                ts: order.ts,
            };
            trades.push(trade);
            publisher.publish(EngineEvent::Trade { order_id: order.order_id, trade });

            order.quantity -= fill_qty;
            log::debug!(
                "TRADE maker={} taker={} px={} qty={}",
                trade.maker_id,
                trade.taker_id,
                trade.price,
                trade.quantity
            );

            if fill_qty == maker_qty {
                book.erase_front_at_level(contra, maker_price, maker_id);
            } else {
                book.reduce_front(contra, maker_price, fill_qty);
            }
        }
    }

    // Market orders never rest; any residue is dropped.
    if order.order_type == OrderType::Market {
        return trades;
    }

    if order.quantity > 0 && !book.add_order(order) {
        // Not expected on the residual path; the order was validated above.
        publisher.publish(EngineEvent::Reject { order_id: order.order_id, ts: order.ts });
    }

    trades
}
