//! Event fan-out for status snapshots and poll failures
//!
//! Subscribers are called in subscription order, inline on the polling
//! task. A subscriber that panics is logged and skipped; the remaining
//! subscribers still receive the event.

use netrelay_core::RelayError;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Receiver of session events
///
/// Callbacks run on the polling task and must return quickly.
pub trait EventSink<S>: Send + Sync {
    /// A poll produced a snapshot
    fn on_status(&self, snapshot: &S);

    /// A poll failed; polling has already stopped
    fn on_poll_failure(&self, error: &RelayError);
}

/// Event sink built from two closures
pub struct CallbackSink<F, G> {
    on_status: F,
    on_failure: G,
}

impl<F, G> CallbackSink<F, G> {
    pub fn new(on_status: F, on_failure: G) -> Self {
        Self {
            on_status,
            on_failure,
        }
    }
}

impl<S, F, G> EventSink<S> for CallbackSink<F, G>
where
    F: Fn(&S) + Send + Sync,
    G: Fn(&RelayError) + Send + Sync,
{
    fn on_status(&self, snapshot: &S) {
        (self.on_status)(snapshot)
    }

    fn on_poll_failure(&self, error: &RelayError) {
        (self.on_failure)(error)
    }
}

/// Token returned by [`EventDispatcher::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered list of subscribers
pub struct EventDispatcher<S> {
    next_id: AtomicU64,
    subscribers: RwLock<Vec<(SubscriptionId, Arc<dyn EventSink<S>>)>>,
}

impl<S> Default for EventDispatcher<S> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscribers: RwLock::new(Vec::new()),
        }
    }
}

impl<S> fmt::Debug for EventDispatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<S> EventDispatcher<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, sink: Arc<dyn EventSink<S>>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((id, sink));
        id
    }

    /// Remove a subscriber; returns false if it was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn dispatch_status(&self, snapshot: &S) {
        self.fan_out("status", |sink| sink.on_status(snapshot));
    }

    pub fn dispatch_failure(&self, error: &RelayError) {
        self.fan_out("poll failure", |sink| sink.on_poll_failure(error));
    }

    fn fan_out(&self, event: &str, deliver: impl Fn(&dyn EventSink<S>)) {
        // Snapshot the list so subscribers may (un)subscribe from a callback
        let subscribers: Vec<_> = self
            .subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(id, sink)| (*id, Arc::clone(sink)))
            .collect();

        for (id, sink) in subscribers {
            if catch_unwind(AssertUnwindSafe(|| deliver(sink.as_ref()))).is_err() {
                log::error!("Subscriber {:?} panicked while handling {} event", id, event);
            }
        }
    }
}
