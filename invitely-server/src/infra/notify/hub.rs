use std::fmt;

use axum::extract::ws::{Message, Utf8Bytes};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::observer::{Observer, ObserverId};

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub dropped: usize,
}

/// Registry of connected observers and fan-out of events to them.
///
/// The registry lock is held for the whole of a broadcast, so broadcasts
/// form a single total order and every observer receives them in that
/// order. Observer queues are unbounded and delivery never waits; only an
/// observer whose writer has stopped is removed, and the broadcast carries
/// on with the rest.
#[derive(Default)]
pub struct NotificationHub {
    observers: Mutex<Vec<Observer>>,
}

impl fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationHub")
            .field("observer_count", &self.len())
            .finish()
    }
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the queue feeding one observer's writer task.
    pub fn channel(
        &self,
    ) -> (
        mpsc::UnboundedSender<Message>,
        mpsc::UnboundedReceiver<Message>,
    ) {
        mpsc::unbounded_channel()
    }

    /// Add a connected observer at the end of the registry.
    pub fn register(
        &self,
        sender: mpsc::UnboundedSender<Message>,
    ) -> ObserverId {
        let observer = Observer::new(sender);
        let id = observer.id;
        let mut observers = self.observers.lock();
        observers.push(observer);
        debug!(
            observer.id = %id,
            observers = observers.len(),
            "observer registered"
        );
        id
    }

    /// Returns `false` if the observer was already gone.
    pub fn deregister(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|observer| observer.id != id);
        let removed = observers.len() != before;
        if removed {
            debug!(
                observer.id = %id,
                observers = observers.len(),
                "observer deregistered"
            );
        }
        removed
    }

    /// Serialize `event` once and queue it for every connected observer in
    /// registry order.
    pub fn broadcast<E>(
        &self,
        event: &E,
    ) -> Result<BroadcastReport, serde_json::Error>
    where
        E: Serialize + ?Sized,
    {
        let payload = Utf8Bytes::from(serde_json::to_string(event)?);
        let mut report = BroadcastReport::default();

        let mut observers = self.observers.lock();
        observers.retain(|observer| {
            match observer.deliver(Message::Text(payload.clone())) {
                Ok(()) => {
                    report.delivered += 1;
                    true
                }
                Err(err) => {
                    warn!(
                        observer.id = %observer.id,
                        error = %err,
                        "dropping observer after failed delivery"
                    );
                    report.dropped += 1;
                    false
                }
            }
        });

        Ok(report)
    }

    pub fn len(&self) -> usize {
        self.observers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.lock().is_empty()
    }

    /// Registered observer ids in registry order.
    pub fn observer_ids(&self) -> Vec<ObserverId> {
        self.observers
            .lock()
            .iter()
            .map(|observer| observer.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn text(frame: Message) -> Value {
        match frame {
            Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[test]
    fn every_connected_observer_gets_one_copy() {
        let hub = NotificationHub::new();
        let mut receivers = Vec::new();
        for _ in 0..3 {
            let (tx, rx) = hub.channel();
            hub.register(tx);
            receivers.push(rx);
        }

        let report = hub.broadcast(&json!({"event": "checkin", "guest": "A"}));

        assert_eq!(
            report.unwrap(),
            BroadcastReport {
                delivered: 3,
                dropped: 0
            }
        );
        for rx in &mut receivers {
            assert_eq!(
                text(rx.try_recv().unwrap()),
                json!({"event": "checkin", "guest": "A"})
            );
            assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn events_arrive_in_broadcast_order() {
        let hub = NotificationHub::new();
        let (tx, mut rx) = hub.channel();
        hub.register(tx);

        for n in 0..5 {
            hub.broadcast(&json!({"seq": n})).unwrap();
        }

        for n in 0..5 {
            assert_eq!(text(rx.try_recv().unwrap())["seq"], n);
        }
    }

    #[test]
    fn failed_observer_is_dropped_and_others_still_receive() {
        let hub = NotificationHub::new();
        let (first_tx, mut first_rx) = hub.channel();
        let (gone_tx, gone_rx) = hub.channel();
        let (last_tx, mut last_rx) = hub.channel();
        hub.register(first_tx);
        let gone = hub.register(gone_tx);
        hub.register(last_tx);
        drop(gone_rx);

        let report = hub.broadcast(&json!({"n": 1})).unwrap();

        assert_eq!(report.delivered, 2);
        assert_eq!(report.dropped, 1);
        assert!(!hub.observer_ids().contains(&gone));
        assert!(first_rx.try_recv().is_ok());
        assert!(last_rx.try_recv().is_ok());

        let report = hub.broadcast(&json!({"n": 2})).unwrap();
        assert_eq!(report.dropped, 0);
        assert_eq!(report.delivered, 2);
    }

    #[test]
    fn burst_reaches_a_slow_observer_in_full() {
        let hub = NotificationHub::new();
        let (tx, mut rx) = hub.channel();
        hub.register(tx);

        // Nothing is drained until the whole burst has been broadcast.
        for n in 0..5_000 {
            let report = hub.broadcast(&json!({"n": n})).unwrap();
            assert_eq!(report.dropped, 0);
        }

        assert_eq!(hub.len(), 1);
        for n in 0..5_000 {
            assert_eq!(text(rx.try_recv().unwrap())["n"], n);
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn deregistered_observer_receives_nothing() {
        let hub = NotificationHub::new();
        let (tx, mut rx) = hub.channel();
        let id = hub.register(tx);

        assert!(hub.deregister(id));
        assert!(!hub.deregister(id));
        let report = hub.broadcast(&json!({"n": 1})).unwrap();

        assert_eq!(report, BroadcastReport::default());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn registry_keeps_registration_order() {
        let hub = NotificationHub::new();
        let mut ids = Vec::new();
        let mut keep = Vec::new();
        for _ in 0..4 {
            let (tx, rx) = hub.channel();
            ids.push(hub.register(tx));
            keep.push(rx);
        }
        hub.deregister(ids[1]);
        ids.remove(1);

        assert_eq!(hub.observer_ids(), ids);
        assert_eq!(hub.len(), 3);
    }
}
