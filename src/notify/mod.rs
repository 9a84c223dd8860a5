//! The `notify` module decides whether a mutation produces a notification,
//! which event kind it carries, and which topic receives it.

pub mod emitter;
pub mod visibility;

pub use emitter::{NotificationEmitter, UnpublishSnapshot};
pub use visibility::visibility_transition;
