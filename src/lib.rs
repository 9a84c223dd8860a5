//! # blogsub
//!
//! `blogsub` is the write side of a small blogging service (users, posts,
//! comments) together with the change notifications that keep live
//! subscribers in sync with it.
//!
//! ## Core Modules
//!
//! - `bus`: topic-addressed publish/subscribe with per-sink isolation.
//! - `notify`: decides whether a mutation notifies, with which event kind,
//!   and on which topic, including the publish/unpublish transitions of posts.
//! - `mutation`: validating handlers that write to the store and then notify.
//! - `persistence`: the record store (`MemoryStore`, `SledStore`).
//! - `model`: record snapshots and identifiers.
//! - `script`: JSON-lines mutation scripts used by the CLI.
//! - `config`: layered settings loading.
//! - `utils`: error types and logging setup.

pub mod bus;
pub mod config;
pub mod model;
pub mod mutation;
pub mod notify;
pub mod persistence;
pub mod script;
pub mod utils;
