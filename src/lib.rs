//! A multi-symbol continuous-auction matching engine.
//!
//! Each symbol gets one [`SymbolEngine`]: a price/time-priority
//! [`OrderBook`] with O(1) cancellation, a dedicated matcher thread, and
//! a pair of lock-free SPSC rings decoupling order ingress and event
//! egress from matching. A [`SymbolDirectory`] on top routes commands to
//! the right engine.
//!
//! ```text
//! producer --submit--> [order ring] --> matcher thread --> [event ring] --> consumer
//! ```
//!
//! # Example
//! ```no_run
//! use rust_matching_engine::{Order, Side, SymbolEngine};
//!
//! let engine = SymbolEngine::new();
//! engine.start();
//! engine.submit(Order::limit(1, 1, Side::Buy, 100, 5)).unwrap();
//! engine.submit(Order::limit(2, 1, Side::Sell, 100, 3)).unwrap();
//! engine.process_events();
//! engine.stop();
//! ```

mod book;
mod directory;
mod engine;
mod enums;
mod error;
mod event;
mod matching;
mod math;
mod order_queue;
mod order_side;
pub mod protocol;
mod ring;
mod types;
mod utils;

pub use book::OrderBook;
pub use directory::{Instrument, SharedEventCallback, SymbolDirectory};
pub use engine::{SymbolEngine, DEFAULT_QUEUE_SIZE};
pub use enums::{OrderType, Side};
pub use error::{make_error, EngineError, ErrorType, Result};
pub use event::{EngineEvent, EventCallback};
pub use ring::SpscRing;
pub use types::{
    LevelSummary, Order, OrderId, Price, Quantity, SymbolId, Timestamp, Trade,
    MARKET_BUY_PRICE, MARKET_SELL_PRICE,
};
