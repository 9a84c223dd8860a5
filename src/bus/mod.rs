//! The `bus` module is the topic-addressed publish/subscribe primitive that
//! notifications travel over.
//!
//! Producers publish an [`Event`] to a [`Topic`]; every sink subscribed to
//! that topic at publish time receives its own copy. There is no history and
//! no replay.

pub mod engine;
pub mod event;
pub mod sink;
pub mod topic;

pub use engine::{EventBus, SubscriptionHandle, SubscriptionId};
pub use event::{Event, MutationKind, Payload, ResourceKind};
pub use sink::{FnSink, Sink};
pub use topic::Topic;

#[cfg(test)]
mod tests;
