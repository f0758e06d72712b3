//! Driver daily log CLI library.
//!
//! This crate provides the CLI interface over the duty-status rule engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, DayArgs};
pub use config::Config;
