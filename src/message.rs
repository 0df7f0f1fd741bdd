//! Wire messages sent to the sequencer.

use serde::{Deserialize, Serialize};

use crate::reconcile::{reconcile, PhaseSet};
use crate::report::{Annotation, Outcome};

/// Path appended to the sequencer base URL for every delivery.
pub const API_ENDPOINT: &str = "/message";

/// Summary of a completed test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedTest {
    pub test_id: String,
    pub outcome: Outcome,
    /// Total duration in seconds.
    pub duration: f64,
    /// Annotations gathered from call, setup and teardown.
    pub details: Vec<Annotation>,
}

impl FinishedTest {
    /// Reconciles the collected phases of `test_id` into a summary.
    pub fn from_phases(test_id: impl Into<String>, phases: &PhaseSet) -> Self {
        let reconciled = reconcile(phases);
        Self {
            test_id: test_id.into(),
            outcome: reconciled.outcome,
            duration: reconciled.duration,
            details: phases.annotations(),
        }
    }
}

/// A status message, tagged by its `event` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Message {
    /// A test is about to run.
    TestStarted { test_id: String },
    /// A test finished all of its phases.
    TestFinished(FinishedTest),
}

impl Message {
    /// Creates a `test_started` message.
    pub fn test_started(test_id: impl Into<String>) -> Self {
        Message::TestStarted {
            test_id: test_id.into(),
        }
    }

    /// Returns the test this message is about.
    pub fn test_id(&self) -> &str {
        match self {
            Message::TestStarted { test_id } => test_id,
            Message::TestFinished(finished) => &finished.test_id,
        }
    }

    /// Returns the wire name of the event.
    pub fn event(&self) -> &'static str {
        match self {
            Message::TestStarted { .. } => "test_started",
            Message::TestFinished(_) => "test_finished",
        }
    }
}

impl From<FinishedTest> for Message {
    fn from(finished: FinishedTest) -> Self {
        Message::TestFinished(finished)
    }
}
