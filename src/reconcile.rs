//! Combines the setup, call and teardown reports of one test into a verdict.

use crate::report::{Annotation, Outcome, Phase, PhaseOutcome, PhaseReport};

/// Phase reports collected for a single test, keyed by phase.
///
/// Each slot holds the most recent report for that phase, so arrival order
/// has no influence on reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseSet {
    pub setup: Option<PhaseReport>,
    pub call: Option<PhaseReport>,
    pub teardown: Option<PhaseReport>,
}

impl PhaseSet {
    /// Stores a report in its phase slot, replacing any earlier one.
    pub fn insert(&mut self, report: PhaseReport) {
        match report.phase {
            Phase::Setup => self.setup = Some(report),
            Phase::Call => self.call = Some(report),
            Phase::Teardown => self.teardown = Some(report),
        }
    }

    /// Returns the report for `phase`, if present.
    pub fn get(&self, phase: Phase) -> Option<&PhaseReport> {
        match phase {
            Phase::Setup => self.setup.as_ref(),
            Phase::Call => self.call.as_ref(),
            Phase::Teardown => self.teardown.as_ref(),
        }
    }

    /// Returns true if no phase has been recorded.
    pub fn is_empty(&self) -> bool {
        self.setup.is_none() && self.call.is_none() && self.teardown.is_none()
    }

    /// Iterates over the present reports in setup, call, teardown order.
    pub fn iter(&self) -> impl Iterator<Item = &PhaseReport> {
        [&self.setup, &self.call, &self.teardown]
            .into_iter()
            .flatten()
    }

    /// Sum of the durations of every present phase.
    pub fn total_duration(&self) -> f64 {
        self.iter().map(|report| report.duration).sum()
    }

    /// Annotations from the call, setup and teardown phases, in that order.
    pub fn annotations(&self) -> Vec<Annotation> {
        [Phase::Call, Phase::Setup, Phase::Teardown]
            .into_iter()
            .filter_map(|phase| self.get(phase))
            .flat_map(|report| report.annotations.iter().cloned())
            .collect()
    }
}

/// Verdict computed for one test.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// Final outcome.
    pub outcome: Outcome,
    /// Total duration across all present phases, in seconds.
    pub duration: f64,
}

/// Computes the final outcome and total duration for a test.
///
/// Setup or teardown failures take precedence over whatever the call phase
/// reported. Missing phases are valid input.
pub fn reconcile(phases: &PhaseSet) -> Reconciled {
    Reconciled {
        outcome: final_outcome(phases),
        duration: phases.total_duration(),
    }
}

fn final_outcome(phases: &PhaseSet) -> Outcome {
    let infrastructure_failed = [&phases.setup, &phases.teardown]
        .into_iter()
        .flatten()
        .any(PhaseReport::is_unexpected_failure);
    if infrastructure_failed {
        return Outcome::Error;
    }

    if let Some(call) = &phases.call {
        if call.expected_failure {
            return match call.outcome {
                PhaseOutcome::Passed => Outcome::XPassed,
                _ => Outcome::XFailed,
            };
        }
        return match &call.outcome {
            PhaseOutcome::Passed => Outcome::Passed,
            PhaseOutcome::Failed => Outcome::Failed,
            PhaseOutcome::Skipped => Outcome::Skipped,
            PhaseOutcome::Other(other) => Outcome::Other(other.clone()),
        };
    }

    match &phases.setup {
        Some(setup) if setup.outcome == PhaseOutcome::Skipped => Outcome::Skipped,
        _ => Outcome::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(phase: Phase, outcome: PhaseOutcome, duration: f64) -> PhaseReport {
        PhaseReport::new("test_mod.py::test_case", phase, outcome, duration)
    }

    fn set(reports: Vec<PhaseReport>) -> PhaseSet {
        let mut phases = PhaseSet::default();
        for r in reports {
            phases.insert(r);
        }
        phases
    }

    fn outcome_of(reports: Vec<PhaseReport>) -> Outcome {
        reconcile(&set(reports)).outcome
    }

    #[test]
    fn all_phases_passed_is_passed() {
        let outcome = outcome_of(vec![
            report(Phase::Setup, PhaseOutcome::Passed, 0.0),
            report(Phase::Call, PhaseOutcome::Passed, 0.0),
            report(Phase::Teardown, PhaseOutcome::Passed, 0.0),
        ]);
        assert_eq!(outcome, Outcome::Passed);
    }

    #[test]
    fn setup_failure_dominates_passing_call() {
        let outcome = outcome_of(vec![
            report(Phase::Setup, PhaseOutcome::Failed, 0.0),
            report(Phase::Call, PhaseOutcome::Passed, 0.0),
            report(Phase::Teardown, PhaseOutcome::Passed, 0.0),
        ]);
        assert_eq!(outcome, Outcome::Error);
    }

    #[test]
    fn teardown_failure_dominates_passing_call() {
        let outcome = outcome_of(vec![
            report(Phase::Setup, PhaseOutcome::Passed, 0.0),
            report(Phase::Call, PhaseOutcome::Passed, 0.0),
            report(Phase::Teardown, PhaseOutcome::Failed, 0.0),
        ]);
        assert_eq!(outcome, Outcome::Error);
    }

    #[test]
    fn expected_setup_failure_is_not_an_error() {
        let outcome = outcome_of(vec![
            report(Phase::Setup, PhaseOutcome::Failed, 0.0).with_expected_failure(),
            report(Phase::Call, PhaseOutcome::Failed, 0.0).with_expected_failure(),
            report(Phase::Teardown, PhaseOutcome::Passed, 0.0),
        ]);
        assert_eq!(outcome, Outcome::XFailed);
    }

    #[test]
    fn expected_failure_that_passes_is_xpassed() {
        let outcome = outcome_of(vec![
            report(Phase::Setup, PhaseOutcome::Passed, 0.0),
            report(Phase::Call, PhaseOutcome::Passed, 0.0).with_expected_failure(),
            report(Phase::Teardown, PhaseOutcome::Passed, 0.0),
        ]);
        assert_eq!(outcome, Outcome::XPassed);
    }

    #[test]
    fn expected_failure_that_fails_is_xfailed() {
        let outcome = outcome_of(vec![
            report(Phase::Call, PhaseOutcome::Failed, 0.0).with_expected_failure(),
            report(Phase::Teardown, PhaseOutcome::Passed, 0.0),
        ]);
        assert_eq!(outcome, Outcome::XFailed);
    }

    #[test]
    fn expected_failure_skipped_is_xfailed() {
        let outcome = outcome_of(vec![
            report(Phase::Call, PhaseOutcome::Skipped, 0.0).with_expected_failure(),
        ]);
        assert_eq!(outcome, Outcome::XFailed);
    }

    #[test]
    fn call_outcome_is_mirrored() {
        assert_eq!(
            outcome_of(vec![report(Phase::Call, PhaseOutcome::Failed, 0.0)]),
            Outcome::Failed
        );
        assert_eq!(
            outcome_of(vec![report(Phase::Call, PhaseOutcome::Skipped, 0.0)]),
            Outcome::Skipped
        );
    }

    #[test]
    fn unknown_call_outcome_passes_through() {
        let outcome = outcome_of(vec![report(
            Phase::Call,
            PhaseOutcome::Other("rerun".to_string()),
            0.0,
        )]);
        assert_eq!(outcome, Outcome::Other("rerun".to_string()));
    }

    #[test]
    fn setup_skip_without_call_is_skipped() {
        let outcome = outcome_of(vec![
            report(Phase::Setup, PhaseOutcome::Skipped, 0.0),
            report(Phase::Teardown, PhaseOutcome::Passed, 0.0),
        ]);
        assert_eq!(outcome, Outcome::Skipped);
    }

    #[test]
    fn setup_pass_without_call_is_error() {
        let outcome = outcome_of(vec![
            report(Phase::Setup, PhaseOutcome::Passed, 0.0),
            report(Phase::Teardown, PhaseOutcome::Passed, 0.0),
        ]);
        assert_eq!(outcome, Outcome::Error);
    }

    #[test]
    fn empty_set_is_error() {
        let reconciled = reconcile(&PhaseSet::default());
        assert_eq!(reconciled.outcome, Outcome::Error);
        assert_eq!(reconciled.duration, 0.0);
    }

    #[test]
    fn every_phase_combination_reconciles() {
        let outcomes = [
            PhaseOutcome::Passed,
            PhaseOutcome::Failed,
            PhaseOutcome::Skipped,
            PhaseOutcome::Other("weird".to_string()),
        ];
        let options = |phase: Phase| {
            let mut v: Vec<Option<PhaseReport>> = vec![None];
            for o in &outcomes {
                for xfail in [false, true] {
                    let mut r = report(phase, o.clone(), 0.1);
                    r.expected_failure = xfail;
                    v.push(Some(r));
                }
            }
            v
        };

        for setup in options(Phase::Setup) {
            for call in options(Phase::Call) {
                for teardown in options(Phase::Teardown) {
                    let phases = PhaseSet {
                        setup: setup.clone(),
                        call: call.clone(),
                        teardown: teardown.clone(),
                    };
                    let reconciled = reconcile(&phases);
                    if let Outcome::Other(other) = &reconciled.outcome {
                        assert_eq!(other, "weird");
                    }
                    let expected = phases.iter().count() as f64 * 0.1;
                    assert!((reconciled.duration - expected).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn duration_sums_present_phases() {
        let reconciled = reconcile(&set(vec![
            report(Phase::Setup, PhaseOutcome::Passed, 0.1),
            report(Phase::Call, PhaseOutcome::Passed, 0.2),
            report(Phase::Teardown, PhaseOutcome::Passed, 0.05),
        ]));
        assert!((reconciled.duration - 0.35).abs() < 1e-9);

        let partial = reconcile(&set(vec![
            report(Phase::Setup, PhaseOutcome::Skipped, 0.1),
            report(Phase::Teardown, PhaseOutcome::Passed, 0.05),
        ]));
        assert!((partial.duration - 0.15).abs() < 1e-9);
    }

    #[test]
    fn annotations_follow_call_setup_teardown_order() {
        let phases = set(vec![
            report(Phase::Setup, PhaseOutcome::Passed, 0.0)
                .with_annotation(Annotation::new("from", "setup")),
            report(Phase::Call, PhaseOutcome::Passed, 0.0)
                .with_annotation(Annotation::new("from", "call"))
                .with_annotation(Annotation::new("n", 1)),
            report(Phase::Teardown, PhaseOutcome::Passed, 0.0)
                .with_annotation(Annotation::new("from", "teardown")),
        ]);

        assert_eq!(
            phases.annotations(),
            vec![
                Annotation::new("from", "call"),
                Annotation::new("n", 1),
                Annotation::new("from", "setup"),
                Annotation::new("from", "teardown"),
            ]
        );
    }

    #[test]
    fn later_report_for_same_phase_replaces_earlier() {
        let phases = set(vec![
            report(Phase::Call, PhaseOutcome::Failed, 0.3),
            report(Phase::Call, PhaseOutcome::Passed, 0.1),
        ]);
        assert_eq!(phases.iter().count(), 1);
        assert_eq!(reconcile(&phases).outcome, Outcome::Passed);
    }
}
