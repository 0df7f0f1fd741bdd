//! Per-phase test reports as produced by the host test runner.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three stages of a single test's execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Fixture setup.
    Setup,
    /// The test body itself.
    Call,
    /// Fixture teardown. Arrival of this phase completes the test.
    Teardown,
}

impl Phase {
    /// Returns the wire name of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Call => "call",
            Phase::Teardown => "teardown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single phase as reported by the runner.
///
/// Unknown values are preserved in [`PhaseOutcome::Other`] so they can be
/// passed through to the sequencer unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PhaseOutcome {
    Passed,
    Failed,
    Skipped,
    Other(String),
}

impl PhaseOutcome {
    /// Returns the wire name of the outcome.
    pub fn as_str(&self) -> &str {
        match self {
            PhaseOutcome::Passed => "passed",
            PhaseOutcome::Failed => "failed",
            PhaseOutcome::Skipped => "skipped",
            PhaseOutcome::Other(other) => other,
        }
    }
}

impl From<String> for PhaseOutcome {
    fn from(value: String) -> Self {
        match value.as_str() {
            "passed" => PhaseOutcome::Passed,
            "failed" => PhaseOutcome::Failed,
            "skipped" => PhaseOutcome::Skipped,
            _ => PhaseOutcome::Other(value),
        }
    }
}

impl From<PhaseOutcome> for String {
    fn from(value: PhaseOutcome) -> Self {
        match value {
            PhaseOutcome::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

/// A user-supplied annotation attached to a test.
///
/// Opaque JSON forwarded to the sequencer as-is. Runners usually record
/// `[key, value]` pairs, which [`Annotation::new`] builds, but any shape is
/// accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotation(pub serde_json::Value);

impl Annotation {
    /// Creates a `[key, value]` annotation.
    pub fn new(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self(serde_json::Value::Array(vec![
            serde_json::Value::String(key.into()),
            value.into(),
        ]))
    }
}

impl From<serde_json::Value> for Annotation {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Report for one (test, phase) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseReport {
    /// Identifier of the test, unique per invocation.
    pub test_id: String,
    /// Which phase this report covers.
    pub phase: Phase,
    /// Raw result of the phase.
    pub outcome: PhaseOutcome,
    /// Phase duration in seconds. Expected to be non-negative.
    #[serde(default)]
    pub duration: f64,
    /// Whether the test was marked as an expected failure.
    #[serde(default, alias = "wasxfail")]
    pub expected_failure: bool,
    /// User annotations recorded during this phase, in order.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl PhaseReport {
    /// Creates a report with no annotations and no expected-failure marker.
    pub fn new(
        test_id: impl Into<String>,
        phase: Phase,
        outcome: PhaseOutcome,
        duration: f64,
    ) -> Self {
        Self {
            test_id: test_id.into(),
            phase,
            outcome,
            duration,
            expected_failure: false,
            annotations: Vec::new(),
        }
    }

    /// Marks the report as belonging to an expected-failure test.
    pub fn with_expected_failure(mut self) -> Self {
        self.expected_failure = true;
        self
    }

    /// Appends an annotation.
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Replaces a negative or non-finite duration with zero.
    ///
    /// Returns true if the duration had to be changed.
    pub fn clamp_duration(&mut self) -> bool {
        if self.duration.is_finite() && self.duration >= 0.0 {
            return false;
        }
        self.duration = 0.0;
        true
    }

    /// Returns true if the phase failed without being an expected failure.
    pub fn is_unexpected_failure(&self) -> bool {
        self.outcome == PhaseOutcome::Failed && !self.expected_failure
    }
}

/// Final classified result of a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
    /// Setup or teardown failed, or the test never reached its call phase.
    Error,
    /// Expected failure that did fail.
    XFailed,
    /// Expected failure that passed.
    XPassed,
    /// Unrecognized call outcome, passed through verbatim.
    Other(String),
}

impl Outcome {
    /// Returns the wire name of the outcome.
    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Skipped => "skipped",
            Outcome::Error => "error",
            Outcome::XFailed => "xfailed",
            Outcome::XPassed => "xpassed",
            Outcome::Other(other) => other,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Outcome {
    fn from(value: String) -> Self {
        match value.as_str() {
            "passed" => Outcome::Passed,
            "failed" => Outcome::Failed,
            "skipped" => Outcome::Skipped,
            "error" => Outcome::Error,
            "xfailed" => Outcome::XFailed,
            "xpassed" => Outcome::XPassed,
            _ => Outcome::Other(value),
        }
    }
}

impl From<Outcome> for String {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}
