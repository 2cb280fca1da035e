//! Gate decision engine.
//!
//! One run evaluates one issue category:
//!
//!   Evaluating → Reporting → {Pass, Fail, ReportedFail, BypassedPass}
//!
//! Decision policy, first match wins:
//!
//!   - authorized bypass                → BypassedPass  (exit 0)
//!   - blocking issues, BLOCK active    → Fail          (exit 2)
//!   - blocking issues, REPORT only     → ReportedFail  (exit 0)
//!   - no blocking issues               → Pass          (exit 0)
//!
//! The summary always covers every evaluated issue regardless of outcome.
//! In diff mode only newly introduced issues can block; issues already
//! present in the base revision are reported as informational.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::DiffError;
use crate::gate::bypass::AuthorizedBypass;
use crate::gate::config::{DiffFallback, DiffMode, GateConfig};
use crate::gate::exit_codes;
use crate::issues::{Category, DiffOutcome, Issue, MatchTier, ScanResult, classify, diff};
use crate::report::render::render_summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    /// Blocking issues under BLOCK mode.
    Fail,
    /// Blocking issues under REPORT-only mode; the status check fails but
    /// the process does not.
    ReportedFail,
    BypassedPass,
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Fail => exit_codes::POLICY,
            Outcome::Pass | Outcome::ReportedFail | Outcome::BypassedPass => exit_codes::PASS,
        }
    }

    /// Whether an external status check should show failure.
    pub fn status_check_failed(&self) -> bool {
        matches!(self, Outcome::Fail | Outcome::ReportedFail)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Pass => "pass",
            Outcome::Fail => "fail",
            Outcome::ReportedFail => "reported_fail",
            Outcome::BypassedPass => "bypassed_pass",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GateVerdict {
    pub category: Category,
    pub outcome: Outcome,
    pub blocking_issues: Vec<Issue>,
    pub informational_issues: Vec<Issue>,
    /// Base revision match of each informational issue, index-aligned with
    /// `informational_issues`; `None` marks a new issue. Empty outside diff
    /// mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub informational_matches: Vec<Option<MatchTier>>,
    pub exit_code: i32,
    /// Present when diff mode produced a comparison.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<DiffOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bypass: Option<AuthorizedBypass>,
    /// Issues of another category present in the input and not evaluated.
    pub out_of_category: usize,
    /// Conditions worth surfacing in the summary, such as a diff fallback.
    pub notes: Vec<String>,
    pub summary_text: String,
}

impl GateVerdict {
    pub fn total_issues(&self) -> usize {
        self.blocking_issues.len() + self.informational_issues.len()
    }
}

/// Evaluate `issues` under `config`.
///
/// `base` is the base revision scan used in diff mode; it is ignored when
/// diff mode is off. An unusable base either falls back to full
/// evaluation or returns [`DiffError::BaseRevisionUnavailable`],
/// depending on the configured fallback.
pub fn evaluate(
    config: &GateConfig,
    issues: &[Issue],
    base: Option<&ScanResult>,
) -> Result<GateVerdict, DiffError> {
    // Evaluating
    let (in_category, out_of_category): (Vec<Issue>, Vec<Issue>) = issues
        .iter()
        .cloned()
        .partition(|i| i.category == config.category);
    if !out_of_category.is_empty() {
        debug!(
            category = %config.category,
            skipped = out_of_category.len(),
            "ignoring issues from other categories"
        );
    }

    let mut notes = Vec::new();
    let diff_outcome = match config.diff {
        DiffMode::Off => None,
        DiffMode::On { fallback } => {
            let result = match base {
                Some(scan) => diff(&in_category, scan),
                None => Err(DiffError::BaseRevisionUnavailable {
                    revision: "<none>".into(),
                    status: "missing".into(),
                }),
            };
            match (result, fallback) {
                (Ok(outcome), _) => Some(outcome),
                (Err(e), DiffFallback::Full) => {
                    warn!(error = %e, "diff mode unavailable, evaluating all issues");
                    notes.push(format!("Diff mode fell back to full evaluation: {e}."));
                    None
                }
                (Err(e), DiffFallback::Fail) => return Err(e),
            }
        }
    };

    let (blocking_issues, informational_issues, informational_matches) = match &diff_outcome {
        Some(d) => {
            let c = classify(&d.new, &config.block_on);
            let mut informational = c.informational;
            let mut matches = vec![None; informational.len()];
            for p in &d.persisted {
                informational.push(p.issue.clone());
                matches.push(Some(p.tier));
            }
            (c.blocking, informational, matches)
        }
        None => {
            let c = classify(&in_category, &config.block_on);
            (c.blocking, c.informational, Vec::new())
        }
    };

    // Reporting
    let outcome = if config.bypass.is_some() {
        Outcome::BypassedPass
    } else if blocking_issues.is_empty() {
        Outcome::Pass
    } else if config.modes.block {
        Outcome::Fail
    } else {
        Outcome::ReportedFail
    };

    info!(
        category = %config.category,
        modes = %config.modes,
        outcome = outcome.as_str(),
        blocking = blocking_issues.len(),
        informational = informational_issues.len(),
        "gate evaluated"
    );

    let mut verdict = GateVerdict {
        category: config.category,
        outcome,
        blocking_issues,
        informational_issues,
        informational_matches,
        exit_code: outcome.exit_code(),
        diff: diff_outcome,
        bypass: config.bypass.clone(),
        out_of_category: out_of_category.len(),
        notes,
        summary_text: String::new(),
    };
    verdict.summary_text = render_summary(&verdict, config);

    Ok(verdict)
}
