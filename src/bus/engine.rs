//! Event bus engine
//!
//! This module contains the in-memory bus responsible for:
//! - keeping the topic -> subscriber mapping
//! - fanning an event out to every current subscriber of a topic
//! - isolating sink failures from each other and from the publisher
//!
//! Concurrency and usage notes:
//! - `EventBus` is a cheap `Clone` handle over a shared registry guarded by a
//!   `RwLock`. Publishing takes the read lock only long enough to copy the
//!   subscriber list; delivery runs with no lock held, so subscribe and
//!   unsubscribe may proceed concurrently with a fan-out.
//! - Every subscriber owns an unbounded queue. `publish` only enqueues, so it
//!   never waits on a sink. Callback sinks are drained by a dedicated worker
//!   thread per subscription; a slow or panicking callback only delays its
//!   own queue.
//! - Once `unsubscribe` returns, no publish that starts afterwards can reach
//!   the removed sink. Events already queued for it are still delivered.
//! - Delivery is at-most-once with no history: a topic without subscribers
//!   drops the event.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, trace, warn};
use uuid::Uuid;

use crate::bus::event::Event;
use crate::bus::sink::Sink;
use crate::bus::topic::Topic;
use crate::utils::error::SinkError;

pub type SubscriptionId = Uuid;

/// Returned by `subscribe`; hand it back to `unsubscribe`.
///
/// The handle does not own the subscription. Dropping it leaves the sink
/// registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    id: SubscriptionId,
    topic: Topic,
}

impl SubscriptionHandle {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }
}

#[derive(Clone)]
struct Subscriber {
    id: SubscriptionId,
    tx: UnboundedSender<Event>,
}

#[derive(Default)]
struct Registry {
    topics: HashMap<Topic, Vec<Subscriber>>,
}

impl Registry {
    fn add(&mut self, topic: &Topic, subscriber: Subscriber) {
        self.topics.entry(topic.clone()).or_default().push(subscriber);
    }

    fn remove(&mut self, topic: &Topic, id: SubscriptionId) -> bool {
        let Some(subscribers) = self.topics.get_mut(topic) else {
            return false;
        };
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        let removed = subscribers.len() != before;
        if subscribers.is_empty() {
            self.topics.remove(topic);
            trace!(%topic, "topic has no subscribers left, dropped");
        }
        removed
    }
}

/// Drains `rx` into `sink` until the subscription goes away or the sink
/// reports [`SinkError::Closed`]. Dropping `rx` on exit makes the next
/// publish prune the subscription.
fn drain_into<S: Sink>(
    topic: &Topic,
    id: SubscriptionId,
    sink: S,
    mut rx: UnboundedReceiver<Event>,
) {
    while let Some(event) = rx.blocking_recv() {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| sink.deliver(&event)))
            .unwrap_or(Err(SinkError::Panicked));
        match outcome {
            Ok(()) => {}
            Err(SinkError::Closed) => {
                debug!(%topic, subscription = %id, "sink closed, worker stopping");
                break;
            }
            Err(e) => {
                warn!(%topic, subscription = %id, error = %e, "delivery failed");
            }
        }
    }
    trace!(%topic, subscription = %id, "delivery worker finished");
}

#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<RwLock<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `sink` for every event published to `topic` from now on.
    /// Earlier events are not replayed.
    ///
    /// The sink is driven by its own worker thread, so `deliver` may block
    /// without holding up the publisher or other subscribers.
    pub fn subscribe<S>(&self, topic: Topic, sink: S) -> SubscriptionHandle
    where
        S: Sink + 'static,
    {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();

        let worker_topic = topic.clone();
        let spawned = thread::Builder::new()
            .name(format!("blogsub-sink-{id}"))
            .spawn(move || drain_into(&worker_topic, id, sink, rx));
        if let Err(e) = spawned {
            // the receiver went down with the closure; first publish prunes it
            error!(%topic, subscription = %id, error = %e, "could not start delivery worker");
        }

        self.register(topic, id, tx)
    }

    /// Subscribes through a dedicated unbounded channel. Each subscriber gets
    /// its own channel, so a slow reader never holds up the others.
    pub fn subscribe_channel(&self, topic: Topic) -> (SubscriptionHandle, UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (self.register(topic, Uuid::new_v4(), tx), rx)
    }

    /// Removes the subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        let removed = self.write().remove(&handle.topic, handle.id);
        if removed {
            debug!(topic = %handle.topic, subscription = %handle.id, "unsubscribed");
        }
        removed
    }

    /// Queues `event` for every subscriber of `topic` and returns how many
    /// accepted it. Never waits on a sink.
    ///
    /// Subscribers whose receiving side is gone are unsubscribed once the
    /// fan-out finishes.
    pub fn publish(&self, topic: &Topic, event: Event) -> usize {
        let subscribers = match self.read().topics.get(topic) {
            Some(subscribers) => subscribers.clone(),
            None => {
                trace!(%topic, "no subscribers, event dropped");
                return 0;
            }
        };

        let mut delivered = 0;
        let mut closed = Vec::new();

        for subscriber in &subscribers {
            match subscriber.tx.send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => closed.push(subscriber.id),
            }
        }

        if !closed.is_empty() {
            let mut registry = self.write();
            for id in closed {
                if registry.remove(topic, id) {
                    debug!(%topic, subscription = %id, "pruned closed subscription");
                }
            }
        }

        trace!(%topic, delivered, kind = ?event.kind(), "published");
        delivered
    }

    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.read().topics.get(topic).map_or(0, Vec::len)
    }

    /// Number of topics that currently have at least one subscriber.
    pub fn topic_count(&self) -> usize {
        self.read().topics.len()
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(
        &self,
        topic: Topic,
        id: SubscriptionId,
        tx: UnboundedSender<Event>,
    ) -> SubscriptionHandle {
        self.write().add(&topic, Subscriber { id, tx });
        debug!(%topic, subscription = %id, "subscribed");
        SubscriptionHandle { id, topic }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.topic_count())
            .finish()
    }
}
