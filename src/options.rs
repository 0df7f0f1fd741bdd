//! Registry of command-line options and the listing mode.
//!
//! External tooling runs the reporter with `--list-options` to discover the
//! available settings without executing anything.

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::Result;

/// Flag that gates all reporting.
pub const ENABLE_FLAG: &str = "--enable-sequencer-reporting";
/// Flag that triggers the listing mode. Never listed itself.
pub const LIST_OPTIONS_FLAG: &str = "--list-options";
/// Option carrying the sequencer base URL.
pub const API_OPTION: &str = "--sequencer-api";
/// Option carrying the delivery timeout.
pub const TIMEOUT_OPTION: &str = "--sequencer-timeout";
/// Option naming a TOML configuration file.
pub const CONFIG_OPTION: &str = "--config";
/// Option naming the event stream file.
pub const EVENTS_OPTION: &str = "--events";

/// A registered option as exposed to external tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSpec {
    pub name: String,
    pub default: Value,
    pub help: String,
}

impl OptionSpec {
    /// Creates a new option description.
    pub fn new(name: impl Into<String>, default: Value, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default,
            help: help.into(),
        }
    }
}

/// Every option the reporter accepts.
pub fn registered_options() -> Vec<OptionSpec> {
    vec![
        OptionSpec::new(
            ENABLE_FLAG,
            json!(false),
            "Enable notifications to the test sequencer GUI.",
        ),
        OptionSpec::new(
            LIST_OPTIONS_FLAG,
            json!(false),
            "List all options with their default values as JSON and exit.",
        ),
        OptionSpec::new(API_OPTION, json!(DEFAULT_API_URL), "API URL for sequencer"),
        OptionSpec::new(
            TIMEOUT_OPTION,
            json!(DEFAULT_TIMEOUT_SECS),
            "Seconds to wait for the sequencer before giving up on a message",
        ),
        OptionSpec::new(
            CONFIG_OPTION,
            Value::Null,
            "TOML file with reporter settings; flags override its values",
        ),
        OptionSpec::new(
            EVENTS_OPTION,
            Value::Null,
            "Event stream to read; standard input when omitted",
        ),
    ]
}

/// Serializes `options` as a single-line JSON array, omitting the listing
/// flag itself.
pub fn list_options_json(options: &[OptionSpec]) -> Result<String> {
    let listed: Vec<&OptionSpec> = options
        .iter()
        .filter(|option| option.name != LIST_OPTIONS_FLAG)
        .collect();
    Ok(serde_json::to_string(&listed)?)
}
