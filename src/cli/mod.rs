//! CLI module
//!
//! Command-line interface over the resource accessors.
//!
//! # Commands
//!
//! - `list` - List one resource kind across one or more scopes
//! - `get` - Fetch a single resource by id
//! - `config` - Print the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
