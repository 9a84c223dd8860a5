use serde::{Deserialize, Serialize};

use super::Id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

/// A post is only visible to subscribers while `published` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Id,
    pub title: String,
    pub body: String,
    pub published: bool,
    pub author: Id,
}

impl Post {
    /// True when a field other than `published` differs from `other`.
    ///
    /// `id` is not compared; both snapshots are expected to describe the
    /// same post.
    pub fn content_differs(&self, other: &Post) -> bool {
        self.title != other.title || self.body != other.body || self.author != other.author
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Id,
    pub text: String,
    pub author: Id,
    /// Parent post; selects the comment topic.
    pub post: Id,
}
