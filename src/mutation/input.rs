//! Mutation inputs
//!
//! Create inputs may carry an explicit `id`; otherwise a fresh one is
//! generated. Update inputs only touch the fields that are present.

use serde::Deserialize;

use crate::model::Id;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    #[serde(default)]
    pub id: Option<Id>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub age: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePost {
    #[serde(default)]
    pub id: Option<Id>,
    pub title: String,
    pub body: String,
    pub published: bool,
    pub author: Id,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateComment {
    #[serde(default)]
    pub id: Option<Id>,
    pub text: String,
    pub author: Id,
    pub post: Id,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateComment {
    #[serde(default)]
    pub text: Option<String>,
}
