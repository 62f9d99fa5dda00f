//! Per-symbol engine: one book, one matcher thread, two rings.
//!
//! Orders flow in through the SPSC order ring, are consumed by the
//! dedicated matcher thread, and lifecycle events flow out through the
//! SPSC event ring, drained by [`SymbolEngine::process_events`] on the
//! consumer's thread. The book sits behind an `RwLock`: the matcher takes
//! the write lock per consumed order, a synchronous cancel takes the
//! write lock, and snapshot/best-price queries take the read lock.
//!
//! # Threading contract
//!
//! Exactly one thread calls [`SymbolEngine::submit`] and exactly one
//! thread calls [`SymbolEngine::process_events`]; the rings are SPSC.
//! `cancel` and the read queries may be called from any thread, the
//! matcher included among the contenders for the book lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};

use crate::error::{make_error, ErrorType, Result};
use crate::event::{EngineEvent, EventCallback, EventPublisher};
use crate::{matching, LevelSummary, Order, OrderBook, OrderId, Price, SpscRing};

/// Default ring size for both the order and event rings. Power of 2.
pub const DEFAULT_QUEUE_SIZE: usize = 1024;

pub struct SymbolEngine {
    book: Arc<RwLock<OrderBook>>,
    orders: Arc<SpscRing<Order>>,
    events: Arc<SpscRing<EngineEvent>>,
    callback: Mutex<Option<EventCallback>>,
    running: Arc<AtomicBool>,
    matcher: Mutex<Option<JoinHandle<()>>>,
}

impl Default for SymbolEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolEngine {
    pub fn new() -> Self {
        Self::with_queue_size(DEFAULT_QUEUE_SIZE)
    }

    /// Creates an engine whose rings hold at least `queue_size - 1`
    /// entries (ring sizes round up to a power of two).
    pub fn with_queue_size(queue_size: usize) -> Self {
        Self {
            book: Arc::new(RwLock::new(OrderBook::new())),
            orders: Arc::new(SpscRing::with_capacity(queue_size)),
            events: Arc::new(SpscRing::with_capacity(queue_size)),
            callback: Mutex::new(None),
            running: Arc::new(AtomicBool::new(false)),
            matcher: Mutex::new(None),
        }
    }

    /// Spawns the matcher thread. Idempotent; a second call while running
    /// is a no-op.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::AcqRel) {
            return; // already running
        }

        let book = Arc::clone(&self.book);
        let orders = Arc::clone(&self.orders);
        let running = Arc::clone(&self.running);
        let publisher = EventPublisher::new(Arc::clone(&self.events));

        let handle = thread::spawn(move || {
            log::info!("matcher thread started");
            while running.load(Ordering::Acquire) {
                match orders.try_pop() {
                    Some(order) => {
                        let mut book = book.write().expect("order book lock poisoned");
                        matching::process(&mut book, &publisher, order);
                    }
                    None => {
                        // Empty ring: hand the core back rather than spin.
                        thread::yield_now();
                    }
                }
            }
            log::info!("matcher thread stopped");
        });

        *self.matcher.lock().expect("matcher handle lock poisoned") = Some(handle);
    }

    /// Stops and joins the matcher thread. Idempotent. Orders still
    /// queued in the ring stay there until a re-`start`.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return; // already stopped
        }
        if let Some(handle) = self.matcher.lock().expect("matcher handle lock poisoned").take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Producer-side submit: pushes the order onto the order ring. A full
    /// ring is backpressure, surfaced as [`ErrorType::QueueFull`]; the
    /// caller decides whether to retry or reject upstream.
    pub fn submit(&self, order: Order) -> Result<()> {
        match self.orders.try_push(order) {
            Ok(()) => Ok(()),
            Err(_) => Err(make_error(ErrorType::QueueFull)),
        }
    }

    /// Synchronous cancel: takes the book's write lock and unlinks the
    /// order immediately. [`ErrorType::OrderNotFound`] if no such order
    /// rests (including orders still queued ahead of the matcher).
    pub fn cancel(&self, order_id: OrderId) -> Result<()> {
        let mut book = self.book.write().expect("order book lock poisoned");
        if book.cancel_order(order_id) {
            Ok(())
        } else {
            Err(make_error(ErrorType::OrderNotFound))
        }
    }

    /// Highest resting buy price.
    pub fn best_bid(&self) -> Option<Price> {
        self.book.read().expect("order book lock poisoned").best_bid()
    }

    /// Lowest resting sell price.
    pub fn best_ask(&self) -> Option<Price> {
        self.book.read().expect("order book lock poisoned").best_ask()
    }

    /// Top-`depth` bid levels, best first; all levels for depth 0.
    pub fn snapshot_bids(&self, depth: usize) -> Vec<LevelSummary> {
        self.book.read().expect("order book lock poisoned").snapshot_bids(depth)
    }

    /// Top-`depth` ask levels, best first; all levels for depth 0.
    pub fn snapshot_asks(&self, depth: usize) -> Vec<LevelSummary> {
        self.book.read().expect("order book lock poisoned").snapshot_asks(depth)
    }

    /// Consumer-side drain: pops every currently available event and
    /// invokes the installed callback for each. Returns the number of
    /// events drained. Intended for the owning application thread, never
    /// the matcher.
    pub fn process_events(&self) -> usize {
        let mut callback = self.callback.lock().expect("event callback lock poisoned");
        let mut drained = 0;
        while let Some(event) = self.events.try_pop() {
            drained += 1;
            if let Some(cb) = callback.as_mut() {
                cb(&event);
            }
        }
        drained
    }

    /// Installs the callback invoked during [`SymbolEngine::process_events`].
    pub fn set_event_callback(&self, callback: EventCallback) {
        *self.callback.lock().expect("event callback lock poisoned") = Some(callback);
    }
}

impl Drop for SymbolEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
