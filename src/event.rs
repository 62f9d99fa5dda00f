//! Lifecycle events published by the matcher on the event ring.
//!
//! For a single order the ring carries `Ack` strictly first, then zero or
//! more `Trade`s, then (when applicable) a terminal event. Cancels are
//! synchronous and report through their return value; `CancelAck` and
//! `CancelReject` are reserved for a queued-cancel ingress.

use serde::{Deserialize, Serialize};

use crate::{OrderId, SpscRing, Timestamp, Trade};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Order accepted by the matcher.
    Ack { order_id: OrderId, ts: Timestamp },
    /// One fill; `order_id` is the taker.
    Trade { order_id: OrderId, trade: Trade },
    /// Reserved: cancel applied.
    CancelAck { order_id: OrderId, ts: Timestamp },
    /// Reserved: cancel against an unknown id.
    CancelReject { order_id: OrderId, ts: Timestamp },
    /// Validation failure at the matcher; the book is untouched.
    Reject { order_id: OrderId, ts: Timestamp },
}

impl EngineEvent {
    /// The order this event refers to (the taker for trades).
    pub fn order_id(&self) -> OrderId {
        match *self {
            EngineEvent::Ack { order_id, .. }
            | EngineEvent::Trade { order_id, .. }
            | EngineEvent::CancelAck { order_id, .. }
            | EngineEvent::CancelReject { order_id, .. }
            | EngineEvent::Reject { order_id, .. } => order_id,
        }
    }
}

/// Callback invoked for each drained event on the consumer thread.
pub type EventCallback = Box<dyn FnMut(&EngineEvent) + Send>;

/// Matcher-side handle to the event ring. A full ring drops the event;
/// the drop is logged so it is at least visible (the consumer is falling
/// behind the matcher).
#[derive(Clone)]
pub(crate) struct EventPublisher {
    ring: Arc<SpscRing<EngineEvent>>,
}

impl EventPublisher {
    pub(crate) fn new(ring: Arc<SpscRing<EngineEvent>>) -> Self {
        Self { ring }
    }

    pub(crate) fn publish(&self, event: EngineEvent) {
        if let Err(dropped) = self.ring.try_push(event) {
            log::warn!("event ring full, dropping {:?}", dropped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_order_id() {
        let ev = EngineEvent::Ack { order_id: 42, ts: 7 };
        assert_eq!(ev.order_id(), 42);

        let t = Trade { maker_id: 1, taker_id: 2, price: 100, quantity: 3, ts: 9 };
        let ev = EngineEvent::Trade { order_id: 2, trade: t };
        assert_eq!(ev.order_id(), 2);
    }

    #[test]
    fn test_event_serialization_tag() {
        let ev = EngineEvent::Reject { order_id: 5, ts: 0 };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"type\":\"reject\""));
        assert!(json.contains("\"order_id\":5"));
    }

    #[test]
    fn test_publisher_drops_when_full() {
        let ring = Arc::new(SpscRing::with_capacity(2)); // usable 1
        let publisher = EventPublisher::new(Arc::clone(&ring));
        publisher.publish(EngineEvent::Ack { order_id: 1, ts: 0 });
        publisher.publish(EngineEvent::Ack { order_id: 2, ts: 0 }); // dropped
        assert_eq!(ring.try_pop(), Some(EngineEvent::Ack { order_id: 1, ts: 0 }));
        assert_eq!(ring.try_pop(), None);
    }
}
