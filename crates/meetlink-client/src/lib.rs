//! meetlink CLI: configuration, argument parsing, and subcommands.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
