//! CLI module
//!
//! Command-line interface over the transactions API.
//!
//! # Commands
//!
//! - `list` - Page through transactions
//! - `approve` - Approve (or revoke approval of) a transaction
//! - `config` - Print the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{fetch_pages, Runner};
