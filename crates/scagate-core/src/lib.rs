pub mod catalog;
pub mod compile;
pub mod error;
pub mod gate;
pub mod issues;
pub mod report;

use tracing::debug;

use crate::error::GateError;
use crate::gate::{GateConfig, GateVerdict};
use crate::issues::source::fetch_current;
use crate::issues::{IssueQuery, IssueSource, ScanResult};

pub const TOOL_NAME: &str = "scagate";

/// JSON schema version of compile and gate reports.
/// Bump only when the report layout changes semantically.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Where the gate reads its scans from.
pub struct GateInputs<'a> {
    pub current: &'a dyn IssueSource,
    pub current_query: IssueQuery,
    /// Base revision scan, consulted only in diff mode.
    pub base: Option<&'a dyn IssueSource>,
    pub base_query: IssueQuery,
}

/// Fetch scans and evaluate the gate.
///
/// Fetch failures abort before evaluation and are never reported as an
/// empty scan.
pub fn run_gate(
    config: &GateConfig,
    inputs: &GateInputs<'_>,
) -> Result<(ScanResult, GateVerdict), GateError> {
    let current = fetch_current(inputs.current, &inputs.current_query)?;

    let base = match (config.diff, inputs.base) {
        (gate::DiffMode::On { .. }, Some(source)) => Some(source.fetch(&inputs.base_query)?),
        _ => None,
    };
    debug!(
        project = %current.project,
        issues = current.issues.len(),
        base_status = base.as_ref().map(|b| b.status.as_str()).unwrap_or("n/a"),
        "scans fetched"
    );

    let verdict = gate::evaluate(config, &current.issues, base.as_ref())?;
    Ok((current, verdict))
}
