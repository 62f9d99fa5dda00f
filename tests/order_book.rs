//! Order book behavior through the public API: validation, cancellation,
//! snapshots, and the invariants the matcher relies on.

use rust_matching_engine::{LevelSummary, Order, OrderBook, Price, Quantity, Side};

fn populated_book(limit_orders: Vec<(u64, Side, Price, Quantity)>) -> OrderBook {
    let mut book = OrderBook::new();
    for (id, side, price, qty) in limit_orders {
        assert!(book.add_order(Order::limit(id, 1, side, price, qty)));
    }
    book
}

#[test]
fn rejects_malformed_orders_without_mutation() {
    let mut book = OrderBook::new();

    assert!(!book.add_order(Order::limit(1, 1, Side::Buy, 0, 5)));
    assert!(!book.add_order(Order::limit(2, 1, Side::Sell, -5, 5)));
    assert!(!book.add_order(Order::limit(3, 1, Side::Buy, 100, 0)));

    assert!(book.is_empty());
    assert_eq!(book.best_bid(), None);
    assert_eq!(book.best_ask(), None);
    assert!(book.snapshot_bids(0).is_empty());
}

#[test]
fn best_prices_follow_the_touch() {
    let mut book = populated_book(vec![
        (1, Side::Buy, 99, 5),
        (2, Side::Buy, 100, 3),
        (3, Side::Sell, 102, 2),
        (4, Side::Sell, 101, 4),
    ]);

    assert_eq!(book.best_bid(), Some(100));
    assert_eq!(book.best_ask(), Some(101));

    assert!(book.cancel_order(2));
    assert_eq!(book.best_bid(), Some(99));
    assert!(book.cancel_order(4));
    assert_eq!(book.best_ask(), Some(102));
}

#[test]
fn cancel_twice_returns_true_then_false() {
    let mut book = populated_book(vec![(1, Side::Buy, 50, 10)]);

    assert!(book.cancel_order(1));
    assert!(!book.cancel_order(1));
    assert!(book.is_empty());
}

#[test]
fn cancel_unknown_id_is_a_noop() {
    let mut book = populated_book(vec![(1, Side::Buy, 50, 10)]);

    assert!(!book.cancel_order(999));
    assert_eq!(book.len(), 1);
    assert_eq!(book.best_bid(), Some(50));
}

#[test]
fn snapshots_aggregate_levels_best_first() {
    let book = populated_book(vec![
        (1, Side::Buy, 100, 5),
        (2, Side::Buy, 100, 7),
        (3, Side::Buy, 99, 1),
        (4, Side::Sell, 101, 2),
        (5, Side::Sell, 103, 2),
        (6, Side::Sell, 103, 6),
    ]);

    assert_eq!(
        book.snapshot_bids(0),
        vec![
            LevelSummary { price: 100, total: 12, num_orders: 2 },
            LevelSummary { price: 99, total: 1, num_orders: 1 },
        ]
    );
    assert_eq!(
        book.snapshot_asks(0),
        vec![
            LevelSummary { price: 101, total: 2, num_orders: 1 },
            LevelSummary { price: 103, total: 8, num_orders: 2 },
        ]
    );

    // depth truncates from the best
    assert_eq!(book.snapshot_asks(1).len(), 1);
    assert_eq!(book.snapshot_asks(1)[0].price, 101);
}

#[test]
fn canceling_mid_level_preserves_queue_totals() {
    let mut book = populated_book(vec![
        (1, Side::Sell, 101, 2),
        (2, Side::Sell, 101, 3),
        (3, Side::Sell, 101, 4),
    ]);

    assert!(book.cancel_order(2));
    assert_eq!(
        book.snapshot_asks(0),
        vec![LevelSummary { price: 101, total: 6, num_orders: 2 }]
    );

    assert!(book.cancel_order(1));
    assert!(book.cancel_order(3));
    assert_eq!(book.best_ask(), None);
}

#[test]
fn emptied_levels_are_dropped_immediately() {
    let mut book = populated_book(vec![(1, Side::Buy, 100, 5), (2, Side::Buy, 99, 5)]);

    assert!(book.cancel_order(1));
    assert_eq!(book.snapshot_bids(0).len(), 1);
    assert_eq!(book.snapshot_bids(0)[0].price, 99);
}

#[test]
fn resting_orders_can_be_looked_up_until_removed() {
    let mut book = populated_book(vec![(1, Side::Buy, 100, 5)]);
    assert!(book.contains(1));
    assert!(!book.contains(2));

    book.cancel_order(1);
    assert!(!book.contains(1));
}
