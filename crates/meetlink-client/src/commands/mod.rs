//! Subcommand implementations.

pub mod auth;
pub mod config;
pub mod demo;
pub mod meetings;
pub mod serve;
