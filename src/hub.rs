//! The `Hub` façade: pairs subscriber adapters with topic patterns over the
//! shared C-trie matcher, and fans out published messages to them.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::message::{Fields, Message};
use crate::subscriber::{Adapter, BlockingSubscriber, NonBlockingSubscriber};
use crate::trie::{split_topic, Matcher, SubscriberId};

/// The topic an overflowing non-blocking subscriber's drop alert is
/// published on. Fields: `missed` (int), `topic` (string list, every
/// pattern the overflowing subscription was registered under).
pub const LOST_MESSAGES_TOPIC: &str = "hub.subscription.messageslost";

/// A handle returned by `subscribe`/`non_blocking_subscribe`, opaque to
/// callers beyond passing it back to `unsubscribe`.
#[derive(Clone, Debug)]
pub struct Subscription {
    inner: crate::trie::Subscription,
}

struct Shared {
    matcher: Matcher,
    subscribers: DashMap<SubscriberId, Arc<dyn Adapter>>,
}

/// An in-process publish/subscribe hub.
///
/// Cloning a `Hub` is cheap (two `Arc` bumps) and yields a handle to the
/// same underlying matcher and subscriber registry — this is how
/// [`Hub::with`] hands a child hub its own context while still routing
/// through the parent's trie.
#[derive(Clone)]
pub struct Hub {
    shared: Arc<Shared>,
    context: Arc<Fields>,
}

impl Hub {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                matcher: Matcher::new(),
                subscribers: DashMap::new(),
            }),
            context: Arc::new(Fields::new()),
        }
    }

    /// Looks up `message.topic()` in the matcher and delivers to every
    /// matched subscriber, in arbitrary order. If this hub carries context
    /// fields, they are merged in first — on key collision the context
    /// wins (resolves a direction `hub.go`'s own callers disagreed on; see
    /// the worked scenario this crate's docs cite).
    pub fn publish(&self, message: Message) {
        let message = self.apply_context(message);
        let segments = split_topic(&message.name);
        let targets = self.shared.matcher.lookup(&segments);

        debug!(topic = %message.name, subscribers = targets.len(), "publish");

        for id in targets {
            if let Some(adapter) = self.shared.subscribers.get(&id) {
                adapter.deliver(message.clone());
            }
        }
    }

    fn apply_context(&self, mut message: Message) -> Message {
        if self.context.is_empty() {
            return message;
        }
        for (k, v) in self.context.iter() {
            message.fields.insert(k.clone(), v.clone());
        }
        message
    }

    /// Registers a blocking buffered subscriber for every pattern in
    /// `patterns` and returns a single handle plus its receive end.
    /// `capacity < 0` is coerced to 0 (rendezvous).
    pub fn subscribe(&self, patterns: &[&str], capacity: i64) -> (Subscription, crossbeam_channel::Receiver<Message>) {
        let id = SubscriberId::new();
        let (adapter, rx) = BlockingSubscriber::new(capacity);
        self.shared.subscribers.insert(id, Arc::new(adapter));
        let owned: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        let inner = self.shared.matcher.subscribe(&owned, id);
        (Subscription { inner }, rx)
    }

    /// Registers a non-blocking lossy subscriber for every pattern in
    /// `patterns`. On overflow it drops the incoming message and publishes
    /// [`LOST_MESSAGES_TOPIC`] through this same hub (so the alert carries
    /// this hub's context too), with `topic` carrying every pattern this
    /// subscriber was registered under. `capacity <= 0` is coerced to a
    /// default of 10.
    pub fn non_blocking_subscribe(
        &self,
        patterns: &[&str],
        capacity: i64,
    ) -> (Subscription, crossbeam_channel::Receiver<Message>) {
        let id = SubscriberId::new();
        let alerting_hub = self.clone();
        let owned: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        let patterns_for_alert = owned.clone();

        let (adapter, rx) = NonBlockingSubscriber::new(
            capacity,
            Arc::new(move |missed| {
                warn!(topics = ?patterns_for_alert, missed, "subscriber buffer full, dropping message");
                alerting_hub.publish(
                    Message::new(LOST_MESSAGES_TOPIC)
                        .with_field("missed", missed as i64)
                        .with_field("topic", patterns_for_alert.clone()),
                );
            }),
        );

        self.shared.subscribers.insert(id, Arc::new(adapter));
        let inner = self.shared.matcher.subscribe(&owned, id);
        (Subscription { inner }, rx)
    }

    /// Removes and closes `subscription`. A subscription already removed
    /// (e.g. by a prior `close`) is a silent no-op.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        self.shared.matcher.unsubscribe(&subscription.inner);
        if let Some((_, adapter)) = self.shared.subscribers.remove(&subscription.inner.sub) {
            adapter.close();
        }
    }

    /// Produces a child hub sharing this hub's matcher and subscriber
    /// registry but owning its own immutable merged context:
    /// `child.context = self.context ⊕ fields` (right operand wins
    /// per-key). Mutating one hub's context is impossible by construction
    /// (`Fields` here is captured behind an `Arc` and never mutated in
    /// place), so no change to either is ever visible through the other.
    pub fn with(&self, fields: Fields) -> Self {
        let mut merged = (*self.context).clone();
        for (k, v) in fields {
            merged.insert(k, v);
        }
        Self {
            shared: self.shared.clone(),
            context: Arc::new(merged),
        }
    }

    /// Unsubscribes and closes every subscription currently registered.
    /// Shared by every hub derived from the same root via [`Hub::with`];
    /// callers should only call this on the root hub.
    pub fn close(&self) {
        for sub in self.shared.matcher.subscriptions() {
            self.shared.matcher.unsubscribe(&sub);
            if let Some((_, adapter)) = self.shared.subscribers.remove(&sub.sub) {
                adapter.close();
            }
        }
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}
