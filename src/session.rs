//! Drives a dispatcher from a newline-delimited JSON event stream.
//!
//! A runner adapter writes one event per line:
//!
//! ```text
//! {"hook":"test_started","test_id":"test_mod.py::test_ok"}
//! {"hook":"phase_report","test_id":"test_mod.py::test_ok","phase":"setup","outcome":"passed","duration":0.01}
//! {"hook":"session_finished","exit_status":0}
//! ```

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::dispatcher::{DispatchStats, Dispatcher};
use crate::error::Result;
use crate::report::PhaseReport;

/// One lifecycle event emitted by the host runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "hook", rename_all = "snake_case")]
pub enum HookEvent {
    /// A test is about to run.
    TestStarted { test_id: String },
    /// A phase of a test finished.
    PhaseReport(PhaseReport),
    /// The whole run finished with the runner's own exit status.
    SessionFinished {
        #[serde(default)]
        exit_status: i32,
    },
}

impl HookEvent {
    /// Parses a single line of the event stream.
    pub fn parse(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Outcome of replaying an event stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Events handed to the dispatcher.
    pub events: usize,
    /// Lines that could not be parsed.
    pub malformed: usize,
    /// Exit status reported by the runner, 0 if it never reported one.
    pub exit_status: i32,
    /// Tests discarded at session end for lack of a teardown report.
    pub abandoned: Vec<String>,
    /// Delivery counters.
    pub stats: DispatchStats,
}

/// Applies a single event to the dispatcher.
///
/// Returns the runner's exit status for `session_finished`.
pub async fn apply(dispatcher: &mut Dispatcher, event: HookEvent) -> Option<(i32, Vec<String>)> {
    match event {
        HookEvent::TestStarted { test_id } => {
            dispatcher.on_test_started(&test_id).await;
            None
        }
        HookEvent::PhaseReport(report) => {
            dispatcher.on_phase_report(report).await;
            None
        }
        HookEvent::SessionFinished { exit_status } => {
            Some((exit_status, dispatcher.on_session_finished()))
        }
    }
}

/// Reads events from `reader` until `session_finished` or end of input.
///
/// Malformed lines, including ones that are not valid UTF-8, are logged and
/// skipped. If the stream ends without a `session_finished` event the
/// session is finished implicitly.
pub async fn drive<R>(reader: R, dispatcher: &mut Dispatcher) -> Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = SessionSummary::default();
    let mut lines = reader.split(b'\n');
    let mut line_number = 0usize;

    while let Some(raw) = lines.next_segment().await? {
        line_number += 1;
        let line = match std::str::from_utf8(&raw) {
            Ok(line) => line.trim(),
            Err(e) => {
                tracing::warn!(line = line_number, error = %e, "skipping non UTF-8 event");
                summary.malformed += 1;
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        let event = match HookEvent::parse(line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(line = line_number, error = %e, "skipping malformed event");
                summary.malformed += 1;
                continue;
            }
        };

        summary.events += 1;
        if let Some((exit_status, abandoned)) = apply(dispatcher, event).await {
            summary.exit_status = exit_status;
            summary.abandoned = abandoned;
            summary.stats = dispatcher.stats();
            return Ok(summary);
        }
    }

    tracing::debug!("event stream ended without session_finished");
    summary.abandoned = dispatcher.on_session_finished();
    summary.stats = dispatcher.stats();
    Ok(summary)
}
