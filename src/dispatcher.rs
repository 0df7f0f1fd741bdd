//! Turns runner lifecycle hooks into sequencer messages.

use tracing::Instrument;

use crate::buffer::TestRunBuffer;
use crate::config::ReporterConfig;
use crate::message::Message;
use crate::report::PhaseReport;
use crate::transport::{deliver, Transport};

/// Delivery counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Messages accepted by the sequencer.
    pub sent: usize,
    /// Messages that could not be delivered.
    pub failed: usize,
}

/// Receives lifecycle hooks for one test session.
///
/// Owns the session's configuration and in-flight buffer. Hooks take
/// `&mut self`, so a runner executing tests on several threads must wrap the
/// dispatcher in a mutex.
pub struct Dispatcher {
    config: ReporterConfig,
    buffer: TestRunBuffer,
    transport: Box<dyn Transport>,
    stats: DispatchStats,
    span: tracing::Span,
}

impl Dispatcher {
    /// Creates a dispatcher for a new session.
    pub fn new(config: ReporterConfig, transport: Box<dyn Transport>) -> Self {
        let session_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("session", session_id = %session_id);

        span.in_scope(|| {
            if config.enabled {
                tracing::info!(
                    api_url = %config.api_url,
                    transport = transport.name(),
                    "sequencer reporting enabled"
                );
            } else {
                tracing::info!("sequencer reporting disabled");
            }
        });

        Self {
            config,
            buffer: TestRunBuffer::new(),
            transport,
            stats: DispatchStats::default(),
            span,
        }
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Returns the in-flight buffer.
    pub fn buffer(&self) -> &TestRunBuffer {
        &self.buffer
    }

    /// Returns delivery counters so far.
    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Called when a test is about to start.
    pub async fn on_test_started(&mut self, test_id: &str) {
        if !self.config.enabled || test_id.is_empty() {
            return;
        }
        self.send(Message::test_started(test_id)).await;
    }

    /// Called after each phase of a test.
    ///
    /// A teardown report completes the test: its phases are reconciled, the
    /// entry is evicted and a `test_finished` message is sent.
    pub async fn on_phase_report(&mut self, mut report: PhaseReport) {
        if !self.config.enabled {
            return;
        }

        if report.clamp_duration() {
            tracing::warn!(
                parent: &self.span,
                test_id = %report.test_id,
                phase = %report.phase,
                "phase duration was negative or not finite, counting it as zero"
            );
        }

        let Some(finished) = self.buffer.record(report) else {
            return;
        };
        tracing::debug!(
            parent: &self.span,
            test_id = %finished.test_id,
            outcome = %finished.outcome,
            duration = finished.duration,
            "test finished"
        );
        self.send(Message::from(finished)).await;
    }

    /// Called once after the whole run.
    ///
    /// Sends nothing. Tests that never received a teardown report are
    /// discarded with a warning and their ids returned.
    pub fn on_session_finished(&mut self) -> Vec<String> {
        let abandoned = self.buffer.drain();
        for test_id in &abandoned {
            tracing::warn!(
                parent: &self.span,
                test_id = %test_id,
                "discarding test without teardown report"
            );
        }
        tracing::info!(
            parent: &self.span,
            sent = self.stats.sent,
            failed = self.stats.failed,
            "session finished"
        );
        abandoned
    }

    async fn send(&mut self, message: Message) {
        let delivered = deliver(self.transport.as_ref(), &message)
            .instrument(self.span.clone())
            .await;
        if delivered {
            self.stats.sent += 1;
        } else {
            self.stats.failed += 1;
        }
    }
}
