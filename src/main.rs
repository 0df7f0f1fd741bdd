//! Sequence Reporter CLI
//!
//! Reads a runner's lifecycle events (JSON lines) and forwards them to the
//! test sequencer.

use clap::Parser;
use tokio::io::BufReader;

use sequence_reporter::cli::Args;
use sequence_reporter::config::Validate;
use sequence_reporter::session::drive;
use sequence_reporter::{list_options_json, registered_options, Dispatcher, HttpTransport};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.list_options {
        match list_options_json(&registered_options()) {
            Ok(json) => {
                println!("{}", json);
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("Failed to list options: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Logs go to stderr; stdout belongs to the listing mode
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = match args.reporter_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    match config.validate().into_result() {
        Ok(warnings) => {
            for warning in warnings {
                tracing::warn!(%warning, "configuration warning");
            }
        }
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    }

    let transport = match HttpTransport::new(config.api_url.clone(), config.timeout()) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };
    let mut dispatcher = Dispatcher::new(config, Box::new(transport));

    let summary = match &args.events {
        Some(path) => match tokio::fs::File::open(path).await {
            Ok(file) => drive(BufReader::new(file), &mut dispatcher).await,
            Err(e) => Err(e.into()),
        },
        None => drive(BufReader::new(tokio::io::stdin()), &mut dispatcher).await,
    };

    match summary {
        Ok(summary) => {
            if summary.malformed > 0 {
                tracing::warn!(count = summary.malformed, "skipped malformed events");
            }
            std::process::exit(summary.exit_status);
        }
        Err(e) => {
            eprintln!("Failed to read events: {}", e);
            std::process::exit(1);
        }
    }
}
