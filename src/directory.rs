//! Multi-symbol dispatch: one engine per instrument.
//!
//! The directory owns the `symbol_id -> engine` map and the monotonic id
//! allocators. Directory mutations serialize on one mutex; routed
//! operations resolve their engine under the lock and release it before
//! touching the engine, so one symbol's matching flow never blocks
//! another symbol's lookups.

use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{make_error, ErrorType, Result};
use crate::event::EngineEvent;
use crate::utils::current_timestamp_millis;
use crate::{LevelSummary, Order, OrderId, Price, SymbolEngine, SymbolId};

/// Instrument metadata. The descriptor strings are opaque to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    pub symbol_id: SymbolId,
    pub ticker: String,
    pub description: String,
    pub industry: String,
    pub initial_price: f64,
    /// Wall-clock creation time, epoch milliseconds.
    pub created_at: i64,
}

/// Shared, clonable event callback installed across engines.
pub type SharedEventCallback = Arc<dyn Fn(&EngineEvent) + Send + Sync>;

struct Entry {
    instrument: Instrument,
    engine: Arc<SymbolEngine>,
}

pub struct SymbolDirectory {
    entries: Mutex<FxHashMap<SymbolId, Entry>>,
    callback: Mutex<Option<SharedEventCallback>>,
    next_symbol_id: AtomicU32,
    next_order_id: AtomicU64,
}

impl Default for SymbolDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolDirectory {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(FxHashMap::default()),
            callback: Mutex::new(None),
            next_symbol_id: AtomicU32::new(1),
            next_order_id: AtomicU64::new(1),
        }
    }

    /// Allocates the next symbol id, constructs and starts an engine for
    /// it, and registers the instrument. Symbol ids are monotonic and
    /// never reused within one process.
    pub fn add_instrument(
        &self,
        ticker: impl Into<String>,
        description: impl Into<String>,
        industry: impl Into<String>,
        initial_price: f64,
    ) -> SymbolId {
        let symbol_id = self.next_symbol_id.fetch_add(1, Ordering::Relaxed);
        let instrument = Instrument {
            symbol_id,
            ticker: ticker.into(),
            description: description.into(),
            industry: industry.into(),
            initial_price,
            created_at: current_timestamp_millis(),
        };

        let engine = Arc::new(SymbolEngine::new());
        if let Some(cb) = self.callback.lock().expect("callback lock poisoned").clone() {
            engine.set_event_callback(Box::new(move |ev| cb(ev)));
        }
        engine.start();

        log::info!("instrument added: id={} ticker={}", symbol_id, instrument.ticker);
        self.entries
            .lock()
            .expect("directory lock poisoned")
            .insert(symbol_id, Entry { instrument, engine });
        symbol_id
    }

    /// Stops the symbol's engine and drops the instrument. Returns
    /// `false` for an unknown symbol.
    pub fn remove_instrument(&self, symbol_id: SymbolId) -> bool {
        let removed = self.entries.lock().expect("directory lock poisoned").remove(&symbol_id);
        match removed {
            Some(entry) => {
                // Engine teardown happens outside the directory lock.
                entry.engine.stop();
                log::info!("instrument removed: id={}", symbol_id);
                true
            }
            None => false,
        }
    }

    pub fn has_instrument(&self, symbol_id: SymbolId) -> bool {
        self.entries.lock().expect("directory lock poisoned").contains_key(&symbol_id)
    }

    pub fn get_instrument(&self, symbol_id: SymbolId) -> Option<Instrument> {
        self.entries
            .lock()
            .expect("directory lock poisoned")
            .get(&symbol_id)
            .map(|e| e.instrument.clone())
    }

    /// All registered instruments, ordered by symbol id.
    pub fn list_instruments(&self) -> Vec<Instrument> {
        let mut out: Vec<Instrument> = self
            .entries
            .lock()
            .expect("directory lock poisoned")
            .values()
            .map(|e| e.instrument.clone())
            .collect();
        out.sort_by_key(|i| i.symbol_id);
        out
    }

    /// Resolves the engine for a symbol. The returned handle outlives the
    /// directory lock, which is released before the caller touches it.
    pub fn engine(&self, symbol_id: SymbolId) -> Option<Arc<SymbolEngine>> {
        self.entries
            .lock()
            .expect("directory lock poisoned")
            .get(&symbol_id)
            .map(|e| Arc::clone(&e.engine))
    }

    /// Allocates the next order id for protocol-level submissions.
    /// Uniqueness across the process is the ingress layer's obligation,
    /// and this counter is how it meets it.
    pub fn next_order_id(&self) -> OrderId {
        self.next_order_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Routes a submit to the order's symbol engine.
    pub fn submit(&self, order: Order) -> Result<()> {
        match self.engine(order.symbol_id) {
            Some(engine) => engine.submit(order),
            None => Err(make_error(ErrorType::UnknownSymbol)),
        }
    }

    /// Routes a cancel to the symbol's engine.
    pub fn cancel(&self, symbol_id: SymbolId, order_id: OrderId) -> Result<()> {
        match self.engine(symbol_id) {
            Some(engine) => engine.cancel(order_id),
            None => Err(make_error(ErrorType::UnknownSymbol)),
        }
    }

    pub fn best_bid(&self, symbol_id: SymbolId) -> Option<Price> {
        self.engine(symbol_id)?.best_bid()
    }

    pub fn best_ask(&self, symbol_id: SymbolId) -> Option<Price> {
        self.engine(symbol_id)?.best_ask()
    }

    /// Bid snapshot for one symbol; empty for an unknown symbol.
    pub fn snapshot_bids(&self, symbol_id: SymbolId, depth: usize) -> Vec<LevelSummary> {
        self.engine(symbol_id).map(|e| e.snapshot_bids(depth)).unwrap_or_default()
    }

    /// Ask snapshot for one symbol; empty for an unknown symbol.
    pub fn snapshot_asks(&self, symbol_id: SymbolId, depth: usize) -> Vec<LevelSummary> {
        self.engine(symbol_id).map(|e| e.snapshot_asks(depth)).unwrap_or_default()
    }

    /// Drains every engine's event ring on the calling thread. Returns
    /// the total number of events drained.
    pub fn process_events(&self) -> usize {
        let engines: Vec<Arc<SymbolEngine>> = {
            let entries = self.entries.lock().expect("directory lock poisoned");
            entries.values().map(|e| Arc::clone(&e.engine)).collect()
        };
        engines.iter().map(|e| e.process_events()).sum()
    }

    /// Installs a callback on every current engine and on engines created
    /// afterwards.
    pub fn set_event_callback(&self, callback: SharedEventCallback) {
        *self.callback.lock().expect("callback lock poisoned") = Some(Arc::clone(&callback));
        let engines: Vec<Arc<SymbolEngine>> = {
            let entries = self.entries.lock().expect("directory lock poisoned");
            entries.values().map(|e| Arc::clone(&e.engine)).collect()
        };
        for engine in engines {
            let cb = Arc::clone(&callback);
            engine.set_event_callback(Box::new(move |ev| cb(ev)));
        }
    }

    /// Stops every engine. Instruments stay registered; a later
    /// [`SymbolDirectory::start`] resumes them.
    pub fn stop(&self) {
        let engines: Vec<Arc<SymbolEngine>> = {
            let entries = self.entries.lock().expect("directory lock poisoned");
            entries.values().map(|e| Arc::clone(&e.engine)).collect()
        };
        for engine in engines {
            engine.stop();
        }
    }

    /// Starts every engine. Idempotent per engine.
    pub fn start(&self) {
        let engines: Vec<Arc<SymbolEngine>> = {
            let entries = self.entries.lock().expect("directory lock poisoned");
            entries.values().map(|e| Arc::clone(&e.engine)).collect()
        };
        for engine in engines {
            engine.start();
        }
    }
}

impl Drop for SymbolDirectory {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Side;

    #[test]
    fn test_symbol_ids_are_monotonic_and_not_reused() {
        let dir = SymbolDirectory::new();
        let a = dir.add_instrument("AAPL", "Apple Inc", "Tech", 150.0);
        let b = dir.add_instrument("MSFT", "Microsoft", "Tech", 300.0);
        assert!(b > a);

        assert!(dir.remove_instrument(a));
        let c = dir.add_instrument("GOOG", "Alphabet", "Tech", 120.0);
        assert!(c > b);
    }

    #[test]
    fn test_remove_instrument_stops_engine() {
        let dir = SymbolDirectory::new();
        let id = dir.add_instrument("AAPL", "Apple Inc", "Tech", 150.0);
        let engine = dir.engine(id).unwrap();
        assert!(engine.is_running());

        assert!(dir.remove_instrument(id));
        assert!(!engine.is_running());
        assert!(!dir.has_instrument(id));
        assert!(!dir.remove_instrument(id));
    }

    #[test]
    fn test_routing_to_unknown_symbol() {
        let dir = SymbolDirectory::new();
        let err = dir.submit(Order::limit(1, 42, Side::Buy, 100, 5)).unwrap_err();
        assert!(err.is(ErrorType::UnknownSymbol));

        let err = dir.cancel(42, 1).unwrap_err();
        assert!(err.is(ErrorType::UnknownSymbol));

        assert_eq!(dir.best_bid(42), None);
        assert!(dir.snapshot_bids(42, 0).is_empty());
    }

    #[test]
    fn test_list_instruments_sorted() {
        let dir = SymbolDirectory::new();
        dir.add_instrument("AAPL", "Apple Inc", "Tech", 150.0);
        dir.add_instrument("XOM", "Exxon Mobil", "Energy", 110.0);

        let list = dir.list_instruments();
        assert_eq!(list.len(), 2);
        assert!(list[0].symbol_id < list[1].symbol_id);
        assert_eq!(list[0].ticker, "AAPL");
        assert_eq!(list[1].industry, "Energy");
    }

    #[test]
    fn test_stop_and_start_fan_out() {
        let dir = SymbolDirectory::new();
        let a = dir.add_instrument("AAPL", "Apple Inc", "Tech", 150.0);
        let b = dir.add_instrument("MSFT", "Microsoft", "Tech", 300.0);

        dir.stop();
        assert!(!dir.engine(a).unwrap().is_running());
        assert!(!dir.engine(b).unwrap().is_running());

        dir.start();
        assert!(dir.engine(a).unwrap().is_running());
        assert!(dir.engine(b).unwrap().is_running());
    }

    #[test]
    fn test_order_id_allocation() {
        let dir = SymbolDirectory::new();
        let a = dir.next_order_id();
        let b = dir.next_order_id();
        assert!(b > a);
    }
}
