//! meetlink CLI entry point.

use std::io;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use meetlink_core::{MeetingRequest, TracingConfig, init_tracing};
use meetlink_google::GoogleBackend;

use meetlink_client::cli::{Cli, Command, ConfigAction};
use meetlink_client::commands;
use meetlink_client::config::ClientConfig;
use meetlink_client::error::{ClientError, ClientResult};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else if matches!(cli.command, Some(Command::Serve { .. })) {
        TracingConfig::server()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let mut config = if cli.config.is_some() {
        ClientConfig::load_from(&config_path).map_err(ClientError::Config)?
    } else {
        ClientConfig::load().map_err(ClientError::Config)?
    };

    if let Some(path) = cli.credentials_file {
        config.google.credentials_file = Some(path);
    }
    if let Some(path) = cli.token_path {
        config.google.token_path = Some(path);
    }

    let Some(command) = cli.command else {
        print_quick_start(&config_path);
        return Ok(());
    };

    let google = config
        .google
        .to_google_config()
        .map_err(ClientError::Config)?;
    let mut stdout = io::stdout();

    match command {
        Command::Auth { force } => commands::auth::google(google, force).await,
        Command::Demo => {
            let backend = GoogleBackend::new(google)?;
            commands::demo::run(&backend, Utc::now(), &mut stdout).await
        }
        Command::Create {
            title,
            start_in,
            duration,
            attendee,
            json,
        } => {
            let backend = GoogleBackend::new(google)?;
            let request = MeetingRequest::starting_in(title, Utc::now(), start_in, duration)
                .map_err(meetlink_google::CalendarError::from)?
                .with_attendees(attendee);
            commands::meetings::create(&backend, request, json, &mut stdout).await
        }
        Command::Upcoming { limit, json } => {
            let backend = GoogleBackend::new(google)?;
            commands::meetings::upcoming(&backend, limit, json, &mut stdout).await
        }
        Command::Serve { bind } => {
            let mut server = config
                .server
                .to_server_config()
                .map_err(ClientError::Config)?;
            if let Some(addr) = bind {
                server.bind = addr;
            }
            commands::serve::run(google, server).await
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        },
    }
}

fn print_quick_start(config_path: &std::path::Path) {
    println!("meetlink - Google Calendar events with Meet links");
    println!();
    println!("Run 'meetlink --help' for usage information.");
    println!();
    println!("Quick start:");
    println!(
        "  1. Download an OAuth client JSON from the Google Cloud Console to {}",
        meetlink_google::GoogleConfig::default_credentials_path().display()
    );
    println!("  2. Log in: meetlink auth");
    println!("  3. Try it: meetlink demo");
    println!();
    println!("Settings: {}", config_path.display());
}
