pub mod accumulator;
pub mod events;
pub mod orchestrator;
pub mod runner;
pub mod scanner;
pub mod state;

pub use accumulator::Accumulator;
pub use events::{EventContext, EventExtras, EventPayload, EventRegistry, EventType, Observer, Plugin};
pub use orchestrator::{CloudConnector, ConnectorConfig};
pub use runner::{AccountOutcome, AccountStatus, Platform, RunReport, ScanRunner};
pub use scanner::{ScanContext, Scanner, ScannerSet};
pub use state::{ScanState, ScanSummary, SubmissionReport};
