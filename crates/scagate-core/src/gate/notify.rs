//! Post-verdict notifications.
//!
//! Notifiers receive a finished verdict. Their failures are logged and
//! returned for inspection but never change the verdict or its exit code.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::NotifyError;
use crate::gate::engine::GateVerdict;

pub trait Notifier {
    fn name(&self) -> &'static str;

    fn notify(&self, verdict: &GateVerdict) -> Result<(), NotifyError>;
}

/// Run every notifier, collecting failures.
pub fn dispatch(verdict: &GateVerdict, notifiers: &[&dyn Notifier]) -> Vec<NotifyError> {
    let mut failures = Vec::new();
    for notifier in notifiers {
        match notifier.notify(verdict) {
            Ok(()) => debug!(notifier = notifier.name(), "notification sent"),
            Err(e) => {
                warn!(notifier = notifier.name(), error = %e, "notification failed");
                failures.push(e);
            }
        }
    }
    failures
}

fn append(path: &Path, notifier: &'static str, content: &str) -> Result<(), NotifyError> {
    let failed = |e: std::io::Error| NotifyError::Failed {
        notifier,
        message: format!("{}: {e}", path.display()),
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(failed)?;
    file.write_all(content.as_bytes()).map_err(failed)
}

/// Appends the Markdown summary to a job summary file
/// (`GITHUB_STEP_SUMMARY`).
#[derive(Debug, Clone)]
pub struct StepSummaryNotifier {
    pub path: PathBuf,
}

impl Notifier for StepSummaryNotifier {
    fn name(&self) -> &'static str {
        "step-summary"
    }

    fn notify(&self, verdict: &GateVerdict) -> Result<(), NotifyError> {
        let mut text = verdict.summary_text.clone();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        append(&self.path, self.name(), &text)
    }
}

/// Writes `key=value` step outputs (`GITHUB_OUTPUT`) so later steps and
/// status checks can act on the verdict.
#[derive(Debug, Clone)]
pub struct StepOutputNotifier {
    pub path: PathBuf,
}

impl Notifier for StepOutputNotifier {
    fn name(&self) -> &'static str {
        "step-output"
    }

    fn notify(&self, verdict: &GateVerdict) -> Result<(), NotifyError> {
        let content = format!(
            "outcome={}\nexit_code={}\nstatus={}\nblocking_count={}\ninformational_count={}\n",
            verdict.outcome.as_str(),
            verdict.exit_code,
            if verdict.outcome.status_check_failed() {
                "failure"
            } else {
                "success"
            },
            verdict.blocking_issues.len(),
            verdict.informational_issues.len(),
        );
        append(&self.path, self.name(), &content)
    }
}
