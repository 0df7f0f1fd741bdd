//! Command-line arguments of the `sequence-reporter` binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::ReporterConfig;
use crate::error::Result;

#[derive(Parser, Debug)]
#[command(name = "sequence-reporter", version, about)]
pub struct Args {
    /// Enable notifications to the test sequencer GUI.
    #[arg(long = "enable-sequencer-reporting")]
    pub enable_sequencer_reporting: bool,

    /// List all options with their default values as JSON and exit.
    #[arg(long)]
    pub list_options: bool,

    /// API URL for sequencer.
    #[arg(long = "sequencer-api")]
    pub sequencer_api: Option<String>,

    /// Seconds to wait for the sequencer before giving up on a message.
    #[arg(long = "sequencer-timeout", value_parser = parse_timeout)]
    pub sequencer_timeout: Option<Duration>,

    /// TOML file with reporter settings; flags override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Event stream to read; standard input when omitted.
    #[arg(long)]
    pub events: Option<PathBuf>,
}

/// Parses seconds, fractions allowed.
fn parse_timeout(value: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = value.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}

impl Args {
    /// Loads the config file, if any, and applies flag overrides on top.
    pub fn reporter_config(&self) -> Result<ReporterConfig> {
        let mut config = match &self.config {
            Some(path) => ReporterConfig::from_file(path)?,
            None => ReporterConfig::default(),
        };
        if self.enable_sequencer_reporting {
            config.enabled = true;
        }
        if let Some(url) = &self.sequencer_api {
            config.api_url = url.clone();
        }
        if let Some(timeout) = self.sequencer_timeout {
            config.timeout = timeout;
        }
        Ok(config)
    }
}
