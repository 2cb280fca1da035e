pub mod classify;
pub mod diff;
pub mod model;
pub mod source;

pub use classify::{Classification, classify};
pub use diff::{DiffOutcome, MatchTier, PersistedIssue, diff};
pub use model::{Category, Issue, ScanResult, ScanStatus};
pub use source::{IssueQuery, IssueSource, JsonFileSource};
