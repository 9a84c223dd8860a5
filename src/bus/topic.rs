//! Topic keys
//!
//! A `Topic` is an opaque string naming a notification channel. Publishers
//! and subscribers build topics through the constructors here so both sides
//! agree on the exact spelling:
//! - `post` for every post event
//! - `comment:<postId>` for comments under one post
//!
//! Topics come into existence on first subscribe and are dropped from the
//! registry once their last subscriber leaves.

use std::fmt;
use std::str::FromStr;

use crate::model::Id;
use crate::utils::error::TopicParseError;

pub const POST_TOPIC: &str = "post";
pub const COMMENT_TOPIC_PREFIX: &str = "comment:";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic(String);

impl Topic {
    /// The single topic carrying every post event.
    pub fn post() -> Self {
        Self(POST_TOPIC.to_string())
    }

    /// The topic carrying comment events for one parent post.
    pub fn comment(post_id: &Id) -> Self {
        Self(format!("{COMMENT_TOPIC_PREFIX}{post_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses a topic requested by a remote client.
///
/// Only the two known families are accepted; a comment topic needs a
/// non-empty post id.
impl FromStr for Topic {
    type Err = TopicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == POST_TOPIC {
            return Ok(Self::post());
        }
        match s.strip_prefix(COMMENT_TOPIC_PREFIX) {
            Some(post_id) if !post_id.is_empty() => Ok(Self::comment(&Id::from(post_id))),
            _ => Err(TopicParseError(s.to_string())),
        }
    }
}
