//! Command-line interface
//!
//! # Commands
//!
//! - `lookup` - One batched round of requests, no pagination
//! - `fetch` - Fetch all pages (optionally up to a record limit) per subject

mod commands;
mod runner;

pub use commands::{Cli, Commands, CommonArgs};
pub use runner::Runner;
