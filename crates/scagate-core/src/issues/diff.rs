//! Diff-mode comparison against a base revision scan.
//!
//! A current issue is `persisted` when the base scan already reported it,
//! decided by the first tier that matches:
//!
//!   1. exact `identity`
//!   2. `(category, issue_type, package_key, rule)`, which tolerates
//!      identities that differ only in version or location metadata
//!
//! Everything else is `new`. The base scan must be complete; a pending,
//! failed or missing base is an error rather than "everything is new".

use std::collections::HashSet;

use serde::Serialize;

use crate::error::DiffError;
use crate::issues::model::{Category, Issue, ScanResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistedIssue {
    pub issue: Issue,
    pub tier: MatchTier,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffOutcome {
    pub base_revision: Option<String>,
    pub new: Vec<Issue>,
    pub persisted: Vec<PersistedIssue>,
}

impl DiffOutcome {
    pub fn persisted_issues(&self) -> Vec<Issue> {
        self.persisted.iter().map(|p| p.issue.clone()).collect()
    }

    pub fn degraded_matches(&self) -> usize {
        self.persisted
            .iter()
            .filter(|p| p.tier == MatchTier::Degraded)
            .count()
    }
}

type DegradedKey<'a> = (Category, &'a str, &'a str, Option<&'a str>);

fn degraded_key(issue: &Issue) -> DegradedKey<'_> {
    (
        issue.category,
        issue.issue_type.as_str(),
        issue.package_key(),
        issue.rule.as_deref(),
    )
}

pub fn diff(current: &[Issue], base: &ScanResult) -> Result<DiffOutcome, DiffError> {
    if !base.is_complete() {
        return Err(DiffError::BaseRevisionUnavailable {
            revision: base.revision_label().to_string(),
            status: base.status.to_string(),
        });
    }

    let exact: HashSet<&str> = base.issues.iter().map(|i| i.identity.as_str()).collect();
    let degraded: HashSet<DegradedKey<'_>> = base.issues.iter().map(degraded_key).collect();

    let mut outcome = DiffOutcome {
        base_revision: base.revision.clone(),
        ..Default::default()
    };

    for issue in current {
        let tier = if exact.contains(issue.identity.as_str()) {
            Some(MatchTier::Exact)
        } else if degraded.contains(&degraded_key(issue)) {
            Some(MatchTier::Degraded)
        } else {
            None
        };

        match tier {
            Some(tier) => outcome.persisted.push(PersistedIssue {
                issue: issue.clone(),
                tier,
            }),
            None => outcome.new.push(issue.clone()),
        }
    }

    Ok(outcome)
}
