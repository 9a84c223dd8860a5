//! The `utils` module holds the pieces shared by every layer of `blogsub`:
//! error types and logging setup.

pub mod error;
pub mod logging;
