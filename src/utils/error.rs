//! The `error` module defines the error types used within `blogsub`.
//!
//! Each layer gets its own enum. Notification failures never surface as a
//! `MutationError`: once a mutation has been committed to the store, sink
//! problems are only logged.

use thiserror::Error;

use crate::model::Id;

/// Failure reported by a single sink while delivering one event.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The receiving side is gone; the subscription is pruned.
    #[error("sink closed")]
    Closed,
    #[error("sink rejected event: {0}")]
    Rejected(String),
    #[error("sink panicked during delivery")]
    Panicked,
}

#[derive(Debug, Error)]
#[error("invalid topic: {0:?}")]
pub struct TopicParseError(pub String);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{table} record {id} already exists")]
    Duplicate { table: &'static str, id: Id },
    #[error("{table} record {id} does not exist")]
    Missing { table: &'static str, id: Id },
    #[error("storage error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("User not found")]
    UserNotFound,
    #[error("Post not found")]
    PostNotFound,
    #[error("Comment not found")]
    CommentNotFound,
    #[error("Email taken")]
    EmailTaken,
    #[error("Post is not published yet")]
    PostNotPublished,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
