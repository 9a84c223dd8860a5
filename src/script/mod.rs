//! The `script` module drives the mutation handlers from a JSON-lines file.
//!
//! It plays the part a request transport would: decode a request, map it
//! onto a mutation, report the outcome, and stream delivered events back
//! out.

pub mod command;
pub mod output;
pub mod runner;

pub use command::ScriptCommand;
pub use output::{DeliveredEvent, print_events};
pub use runner::{RunSummary, apply, parse_script, read_script, run};
