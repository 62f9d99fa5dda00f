//! Bounded lock-free single-producer/single-consumer ring buffer.
//!
//! The ring decouples order ingress and event egress from the matcher
//! thread. Capacity rounds up to a power of two (minimum 2); one slot is
//! reserved to distinguish empty from full, so the usable capacity is
//! `C - 1`. The hot path takes no locks, makes no syscalls and performs
//! no allocation.
//!
//! # Concurrency contract
//!
//! Exactly one thread may call [`SpscRing::try_push`] and exactly one
//! thread may call [`SpscRing::try_pop`]. The producer publishes a slot
//! with a release store on `head`; the consumer's acquire load of `head`
//! therefore also observes the written payload. The consumer frees a slot
//! with a release store on `tail`, paired with the producer's acquire
//! load. [`SpscRing::is_empty`] and [`SpscRing::is_full`] are best-effort
//! snapshots only.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

pub struct SpscRing<T> {
    buffer: Box<[UnsafeCell<MaybeUninit<T>>]>,
    mask: usize,
    // Producer and consumer indices live on separate cache lines so the
    // two threads do not false-share.
    head: CachePadded<AtomicUsize>,
    tail: CachePadded<AtomicUsize>,
}

// One producer and one consumer may hold &SpscRing<T> on different
// threads; slot handoff is ordered by the release/acquire pairs below.
unsafe impl<T: Send> Sync for SpscRing<T> {}
unsafe impl<T: Send> Send for SpscRing<T> {}

impl<T> SpscRing<T> {
    /// Creates a ring holding at least `min_capacity - 1` elements. The
    /// internal size is `min_capacity` rounded up to a power of two, and
    /// never less than 2.
    pub fn with_capacity(min_capacity: usize) -> Self {
        let cap = normalize_capacity(min_capacity);
        let buffer = (0..cap)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            buffer,
            mask: cap - 1,
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
        }
    }

    /// Producer-side push. Returns `Err(value)` if the ring is full; the
    /// ring is unchanged and the caller keeps the value. Full is a
    /// backpressure signal, never a blocking condition.
    pub fn try_push(&self, value: T) -> std::result::Result<(), T> {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) & self.mask;
        if next == self.tail.load(Ordering::Acquire) {
            return Err(value); // full
        }
        unsafe {
            (*self.buffer[head].get()).write(value);
        }
        self.head.store(next, Ordering::Release);
        Ok(())
    }

    /// Consumer-side pop. Returns `None` when `tail == head` at
    /// observation time.
    pub fn try_pop(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None; // empty
        }
        let value = unsafe { (*self.buffer[tail].get()).assume_init_read() };
        self.tail.store((tail + 1) & self.mask, Ordering::Release);
        Some(value)
    }

    /// Best-effort emptiness snapshot.
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Best-effort fullness snapshot.
    pub fn is_full(&self) -> bool {
        let next = (self.head.load(Ordering::Acquire) + 1) & self.mask;
        next == self.tail.load(Ordering::Acquire)
    }

    /// Usable capacity (one slot is reserved).
    pub fn capacity(&self) -> usize {
        self.mask
    }
}

impl<T> Drop for SpscRing<T> {
    fn drop(&mut self) {
        // Producer and consumer are gone; drain whatever is still queued
        // so element destructors run.
        let head = self.head.load(Ordering::Relaxed);
        let mut tail = self.tail.load(Ordering::Relaxed);
        while tail != head {
            unsafe {
                (*self.buffer[tail].get()).assume_init_drop();
            }
            tail = (tail + 1) & self.mask;
        }
    }
}

fn normalize_capacity(n: usize) -> usize {
    n.max(2).next_power_of_two()
}
