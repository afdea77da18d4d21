//! Command-line interface definition.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use meetlink_core::{DEFAULT_DURATION_MINUTES, DEFAULT_START_IN_MINUTES};

/// meetlink - Google Calendar events with Meet links
#[derive(Debug, Parser)]
#[command(name = "meetlink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "MEETLINK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Path to the Google Cloud Console client-secret JSON
    #[arg(long, env = "GOOGLE_CREDENTIALS_FILE")]
    pub credentials_file: Option<PathBuf>,

    /// Path to the stored OAuth token
    #[arg(long, env = "MEETLINK_TOKEN_PATH")]
    pub token_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in to Google Calendar and store the token
    Auth {
        /// Discard the stored token and log in again
        #[arg(long, short)]
        force: bool,
    },

    /// Create a sample meeting one hour from now, then list upcoming meetings
    Demo,

    /// Create a meeting with a Meet link
    Create {
        /// Meeting title
        #[arg(long, short)]
        title: String,

        /// Minutes from now until the meeting starts
        #[arg(long, default_value_t = DEFAULT_START_IN_MINUTES)]
        start_in: i64,

        /// Duration in minutes
        #[arg(long, short, default_value_t = DEFAULT_DURATION_MINUTES)]
        duration: i64,

        /// Attendee email (can be repeated)
        #[arg(long, short, action = clap::ArgAction::Append)]
        attendee: Vec<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List upcoming meetings that have a Meet link
    Upcoming {
        /// Maximum number of events to fetch
        #[arg(long, short, default_value = "10")]
        limit: usize,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Run the HTTP API in the foreground
    Serve {
        /// Address to listen on (overrides config)
        #[arg(long, short, env = "MEETLINK_BIND")]
        bind: Option<SocketAddr>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
