//! Blog records.
//!
//! Every record is a plain value type. Handing one to the notification layer
//! hands over a snapshot: later mutations in the store never reach an event
//! that has already been built.

mod id;
mod records;

pub use id::Id;
pub use records::{Comment, Post, User};
