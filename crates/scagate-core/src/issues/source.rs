//! Issue sources.
//!
//! The gate never talks to the scanner directly; it reads issues through
//! [`IssueSource`]. Failing to obtain issues is a [`FetchError`], which is
//! never confused with a complete scan that found nothing.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::FetchError;
use crate::issues::model::{ScanResult, ScanStatus};

/// Which scan to fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueQuery {
    pub project: Option<String>,
    pub revision: Option<String>,
}

pub trait IssueSource {
    fn fetch(&self, query: &IssueQuery) -> Result<ScanResult, FetchError>;
}

/// Reads a scan document exported by a previous workflow step.
///
/// A missing file is reported as a scan with status `missing` so callers
/// can tell "no scan exists" apart from "scan exists but is unreadable".
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IssueSource for JsonFileSource {
    fn fetch(&self, query: &IssueQuery) -> Result<ScanResult, FetchError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "scan document not found");
                return Ok(ScanResult {
                    project: query.project.clone().unwrap_or_default(),
                    revision: query.revision.clone(),
                    status: ScanStatus::Missing,
                    issues: Vec::new(),
                });
            }
            Err(source) => {
                return Err(FetchError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let mut scan: ScanResult =
            serde_json::from_slice(&bytes).map_err(|source| FetchError::Parse {
                path: self.path.clone(),
                source,
            })?;

        if scan.project.is_empty() {
            if let Some(project) = &query.project {
                scan.project = project.clone();
            }
        }
        if scan.revision.is_none() {
            scan.revision = query.revision.clone();
        }

        debug!(
            path = %self.path.display(),
            project = %scan.project,
            status = %scan.status,
            issues = scan.issues.len(),
            "scan document loaded"
        );
        Ok(scan)
    }
}

/// Fetch the scan under evaluation. Anything but a complete scan is a
/// fetch failure: the gate must not evaluate partial results.
pub fn fetch_current(
    source: &dyn IssueSource,
    query: &IssueQuery,
) -> Result<ScanResult, FetchError> {
    let scan = source.fetch(query)?;
    if !scan.is_complete() {
        return Err(FetchError::Upstream {
            project: scan.project.clone(),
            message: format!(
                "scan for revision {} is {}",
                scan.revision_label(),
                scan.status
            ),
        });
    }
    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn reads_scan_document() {
        let f = write(
            r#"{"project": "p", "revision": "r1", "issues": [
                {"category": "licensing", "issue_type": "policy_flag", "identity": "npm+a$1"}
            ]}"#,
        );
        let scan = JsonFileSource::new(f.path())
            .fetch(&IssueQuery::default())
            .unwrap();
        assert_eq!(scan.project, "p");
        assert_eq!(scan.issues.len(), 1);
        assert!(scan.is_complete());
    }

    #[test]
    fn empty_issue_list_is_a_valid_result() {
        let f = write(r#"{"project": "p", "status": "complete", "issues": []}"#);
        let scan = fetch_current(&JsonFileSource::new(f.path()), &IssueQuery::default()).unwrap();
        assert!(scan.issues.is_empty());
    }

    #[test]
    fn missing_file_reports_missing_status() {
        let query = IssueQuery {
            project: Some("p".into()),
            revision: Some("base".into()),
        };
        let scan = JsonFileSource::new("does/not/exist.json")
            .fetch(&query)
            .unwrap();
        assert_eq!(scan.status, ScanStatus::Missing);
        assert_eq!(scan.revision.as_deref(), Some("base"));
    }

    #[test]
    fn malformed_document_is_a_fetch_failure() {
        let f = write("{\"issues\": 3}");
        let err = JsonFileSource::new(f.path())
            .fetch(&IssueQuery::default())
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
        assert!(err.to_string().contains(&f.path().display().to_string()));
    }

    #[test]
    fn current_scan_must_be_complete() {
        let f = write(r#"{"project": "p", "revision": "r", "status": "pending"}"#);
        let err = fetch_current(&JsonFileSource::new(f.path()), &IssueQuery::default())
            .unwrap_err();
        assert!(matches!(err, FetchError::Upstream { .. }));
        assert!(err.to_string().contains("pending"));
    }

    #[test]
    fn missing_current_scan_is_a_fetch_failure() {
        let err = fetch_current(
            &JsonFileSource::new("nope.json"),
            &IssueQuery::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn query_fills_in_absent_metadata() {
        let f = write(r#"{"issues": []}"#);
        let query = IssueQuery {
            project: Some("from-query".into()),
            revision: Some("abc".into()),
        };
        let scan = JsonFileSource::new(f.path()).fetch(&query).unwrap();
        assert_eq!(scan.project, "from-query");
        assert_eq!(scan.revision.as_deref(), Some("abc"));
    }
}
