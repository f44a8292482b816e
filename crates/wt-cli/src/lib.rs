//! Window time CLI library.
//!
//! This crate provides the CLI interface for window time reports.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, parse_label_source, parse_since};
pub use config::Config;
