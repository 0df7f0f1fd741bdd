//! In-flight phase reports, keyed by test id.

use std::collections::HashMap;

use crate::message::FinishedTest;
use crate::reconcile::PhaseSet;
use crate::report::{Phase, PhaseReport};

/// Accumulates phase reports until a test's teardown arrives.
///
/// An entry lives from the first phase report for a test id until its
/// teardown report, at which point it is reconciled and evicted. Entries for
/// different test ids are independent, so interleaved tests are tolerated.
/// A test whose teardown never arrives stays buffered until [`drain`].
///
/// [`drain`]: TestRunBuffer::drain
#[derive(Debug, Default)]
pub struct TestRunBuffer {
    entries: HashMap<String, PhaseSet>,
}

impl TestRunBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a phase report.
    ///
    /// Returns the finished summary when `report` is a teardown; the test's
    /// entry has already been removed by the time this returns.
    pub fn record(&mut self, report: PhaseReport) -> Option<FinishedTest> {
        let is_teardown = report.phase == Phase::Teardown;
        let test_id = report.test_id.clone();
        self.entries
            .entry(test_id.clone())
            .or_default()
            .insert(report);

        if !is_teardown {
            return None;
        }

        let phases = self.entries.remove(&test_id)?;
        Some(FinishedTest::from_phases(test_id, &phases))
    }

    /// Returns the phases buffered for `test_id`.
    pub fn get(&self, test_id: &str) -> Option<&PhaseSet> {
        self.entries.get(test_id)
    }

    /// Returns true if `test_id` has an open entry.
    pub fn contains(&self, test_id: &str) -> bool {
        self.entries.contains_key(test_id)
    }

    /// Number of tests still waiting for teardown.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no test is in flight.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every open entry and returns the affected test ids, sorted.
    pub fn drain(&mut self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.drain().map(|(id, _)| id).collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Outcome, PhaseOutcome};

    fn report(test_id: &str, phase: Phase, outcome: PhaseOutcome) -> PhaseReport {
        PhaseReport::new(test_id, phase, outcome, 0.1)
    }

    #[test]
    fn setup_and_call_are_buffered() {
        let mut buffer = TestRunBuffer::new();

        assert!(buffer
            .record(report("t", Phase::Setup, PhaseOutcome::Passed))
            .is_none());
        assert!(buffer
            .record(report("t", Phase::Call, PhaseOutcome::Passed))
            .is_none());

        let phases = buffer.get("t").unwrap();
        assert!(phases.setup.is_some());
        assert!(phases.call.is_some());
        assert!(phases.teardown.is_none());
    }

    #[test]
    fn teardown_reconciles_and_evicts() {
        let mut buffer = TestRunBuffer::new();
        buffer.record(report("t", Phase::Setup, PhaseOutcome::Passed));
        buffer.record(report("t", Phase::Call, PhaseOutcome::Failed));

        let finished = buffer
            .record(report("t", Phase::Teardown, PhaseOutcome::Passed))
            .unwrap();

        assert_eq!(finished.test_id, "t");
        assert_eq!(finished.outcome, Outcome::Failed);
        assert!(!buffer.contains("t"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn new_test_does_not_see_evicted_data() {
        let mut buffer = TestRunBuffer::new();
        buffer.record(report("first", Phase::Setup, PhaseOutcome::Failed));
        buffer.record(report("first", Phase::Teardown, PhaseOutcome::Passed));

        buffer.record(report("second", Phase::Call, PhaseOutcome::Passed));
        let phases = buffer.get("second").unwrap();
        assert!(phases.setup.is_none());

        let finished = buffer
            .record(report("second", Phase::Teardown, PhaseOutcome::Passed))
            .unwrap();
        assert_eq!(finished.outcome, Outcome::Passed);
    }

    #[test]
    fn reused_test_id_starts_fresh_after_teardown() {
        let mut buffer = TestRunBuffer::new();
        buffer.record(report("t", Phase::Setup, PhaseOutcome::Failed));
        buffer.record(report("t", Phase::Teardown, PhaseOutcome::Passed));

        let finished = buffer
            .record(report("t", Phase::Teardown, PhaseOutcome::Passed))
            .unwrap();
        assert_eq!(finished.outcome, Outcome::Error);
        assert!((finished.duration - 0.1).abs() < 1e-9);
    }

    #[test]
    fn interleaved_tests_are_kept_apart() {
        let mut buffer = TestRunBuffer::new();
        buffer.record(report("a", Phase::Setup, PhaseOutcome::Passed));
        buffer.record(report("b", Phase::Setup, PhaseOutcome::Passed));
        buffer.record(report("a", Phase::Call, PhaseOutcome::Failed));
        buffer.record(report("b", Phase::Call, PhaseOutcome::Passed));
        assert_eq!(buffer.len(), 2);

        let b = buffer
            .record(report("b", Phase::Teardown, PhaseOutcome::Passed))
            .unwrap();
        assert_eq!(b.outcome, Outcome::Passed);
        assert_eq!(buffer.len(), 1);

        let a = buffer
            .record(report("a", Phase::Teardown, PhaseOutcome::Passed))
            .unwrap();
        assert_eq!(a.outcome, Outcome::Failed);
        assert!(buffer.is_empty());
    }

    #[test]
    fn drain_returns_open_ids() {
        let mut buffer = TestRunBuffer::new();
        buffer.record(report("z", Phase::Setup, PhaseOutcome::Passed));
        buffer.record(report("a", Phase::Call, PhaseOutcome::Passed));

        assert_eq!(buffer.drain(), vec!["a".to_string(), "z".to_string()]);
        assert!(buffer.is_empty());
    }
}
