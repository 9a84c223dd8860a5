//! Event definitions
//!
//! An `Event` is what subscribers receive. It is immutable once built and
//! owns a full copy of the record it describes.
//!
//! Wire shape, keyed by resource kind:
//!
//! ```json
//! { "post": { "mutation": "CREATED", "data": { "id": "...", "title": "..." } } }
//! ```

use serde::{Deserialize, Serialize};

use crate::model::{Comment, Post};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MutationKind {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Post,
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload<T> {
    pub mutation: MutationKind,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    Post(Payload<Post>),
    Comment(Payload<Comment>),
}

impl Event {
    pub fn post(mutation: MutationKind, data: Post) -> Self {
        Self::Post(Payload { mutation, data })
    }

    pub fn comment(mutation: MutationKind, data: Comment) -> Self {
        Self::Comment(Payload { mutation, data })
    }

    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Post(p) => p.mutation,
            Self::Comment(c) => c.mutation,
        }
    }

    pub fn resource(&self) -> ResourceKind {
        match self {
            Self::Post(_) => ResourceKind::Post,
            Self::Comment(_) => ResourceKind::Comment,
        }
    }

    pub fn as_post(&self) -> Option<&Post> {
        match self {
            Self::Post(p) => Some(&p.data),
            Self::Comment(_) => None,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Self::Comment(c) => Some(&c.data),
            Self::Post(_) => None,
        }
    }
}
