//! The `mutation` module holds the write side of the blog: validation,
//! store updates, and the notification that follows each committed change.

pub mod handlers;
pub mod input;

pub use handlers::Mutations;
pub use input::{CreateComment, CreatePost, CreateUser, UpdateComment, UpdatePost, UpdateUser};
