//! Sequence Reporter - live test progress for the sequencer GUI
//!
//! This library observes a test runner's lifecycle (test started, per-phase
//! results, session end), reconciles each test's setup/call/teardown reports
//! into a single verdict and forwards status messages to an HTTP sequencer.

pub mod buffer;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod message;
pub mod options;
pub mod reconcile;
pub mod report;
pub mod session;
pub mod transport;

pub use buffer::TestRunBuffer;
pub use config::{ReporterConfig, Validate, ValidationResult};
pub use dispatcher::{DispatchStats, Dispatcher};
pub use error::Error;
pub use message::{FinishedTest, Message, API_ENDPOINT};
pub use options::{list_options_json, registered_options, OptionSpec};
pub use reconcile::{reconcile, PhaseSet, Reconciled};
pub use report::{Annotation, Outcome, Phase, PhaseOutcome, PhaseReport};
pub use session::{drive, HookEvent, SessionSummary};
pub use transport::{deliver, HttpTransport, Transport};
