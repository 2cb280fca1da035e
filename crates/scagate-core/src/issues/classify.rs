//! Issue classification.
//!
//! Splits scanner issues into blocking and informational sets:
//!
//!   - `issue_type` in `block_on` → blocking
//!   - otherwise                  → informational
//!
//! Matching is exact and case-sensitive. An empty `block_on` disables
//! blocking while keeping every issue visible. Input order is preserved
//! within each set and no issue is dropped.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::issues::model::Issue;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub blocking: Vec<Issue>,
    pub informational: Vec<Issue>,
}

impl Classification {
    pub fn total(&self) -> usize {
        self.blocking.len() + self.informational.len()
    }

    pub fn has_blocking(&self) -> bool {
        !self.blocking.is_empty()
    }
}

pub fn classify(issues: &[Issue], block_on: &BTreeSet<String>) -> Classification {
    let (blocking, informational) = issues
        .iter()
        .cloned()
        .partition(|i| block_on.contains(&i.issue_type));

    Classification {
        blocking,
        informational,
    }
}
