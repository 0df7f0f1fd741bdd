//! Reporter configuration.
//!
//! Built once at session start, then owned read-only by the dispatcher.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default sequencer base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8765/";

/// Default per-delivery timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Settings for reporting to the sequencer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Gates all network activity.
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the sequencer; `/message` is appended for every delivery.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Upper bound on a single delivery. Written as `timeout_secs` in files,
    /// fractions allowed.
    #[serde(
        rename = "timeout_secs",
        with = "secs_f64",
        default = "default_timeout"
    )]
    pub timeout: Duration,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

/// Seconds as a float, e.g. `2` or `0.5`.
mod secs_f64 {
    use std::time::Duration;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
    }
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_api_url(),
            timeout: default_timeout(),
        }
    }
}

impl ReporterConfig {
    /// Creates an enabled configuration pointing at `api_url`.
    pub fn enabled(api_url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Sets the delivery timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the delivery timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Parses a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Problems found in a reporter configuration.
///
/// Errors stop the binary before any event is read. Warnings are logged and
/// the run continues, since a bad destination only costs failed deliveries.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors (fatal).
    pub errors: Vec<String>,
    /// List of validation warnings (non-fatal).
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Converts to a Result, failing if there are errors.
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.is_valid() {
            Ok(self.warnings)
        } else {
            Err(Error::Config(self.errors.join("; ")))
        }
    }
}

/// Trait for validatable configuration types.
pub trait Validate {
    /// Validates the configuration and returns any issues found.
    fn validate(&self) -> ValidationResult;
}

impl Validate for ReporterConfig {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        // A zero timeout fails every request before it is sent
        if self.timeout.is_zero() {
            result.add_error("timeout_secs must be greater than zero");
        }

        if self.timeout > Duration::from_secs(60) {
            result.add_warning("timeout_secs over 60 seconds can stall the test run");
        }

        // Bad URLs only surface as delivery failures later on
        match reqwest::Url::parse(&self.api_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => result.add_warning(format!(
                "api_url '{}' uses unsupported scheme '{}'",
                self.api_url,
                url.scheme()
            )),
            Err(e) => result.add_warning(format!(
                "api_url '{}' is not a valid URL: {}",
                self.api_url, e
            )),
        }

        result
    }
}
