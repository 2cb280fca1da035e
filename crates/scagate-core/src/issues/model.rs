use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Issue family. A single gate run evaluates exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Licensing,
    Vulnerability,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Licensing => "licensing",
            Category::Vulnerability => "vulnerability",
        }
    }

    /// `block_on` used when none is configured.
    pub fn default_block_on(&self) -> &'static [&'static str] {
        match self {
            Category::Licensing => &["policy_conflict"],
            Category::Vulnerability => &["critical", "high"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "licensing" | "license" | "licenses" => Ok(Category::Licensing),
            "vulnerability" | "vulnerabilities" | "security" => Ok(Category::Vulnerability),
            other => Err(format!(
                "unknown issue category `{other}` (expected licensing or vulnerability)"
            )),
        }
    }
}

/// A single finding reported by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub category: Category,
    /// `policy_conflict`, `policy_flag`, or a severity token.
    #[serde(alias = "type")]
    pub issue_type: String,
    /// Scanner-assigned key used for cross-scan matching.
    pub identity: String,
    /// Package locator without version, e.g. `npm+lodash`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Where the dependency was found (manifest path, image layer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// License rule or vulnerability id (e.g. `GPL-3.0`, `CVE-2021-44228`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Issue {
    /// Package identity with version metadata stripped.
    ///
    /// Uses `package` when the scanner supplies it, otherwise the part of
    /// `identity` before the first `$` (locator form `fetcher+name$version`).
    pub fn package_key(&self) -> &str {
        match &self.package {
            Some(p) => p.as_str(),
            None => self
                .identity
                .split_once('$')
                .map(|(name, _)| name)
                .unwrap_or(&self.identity),
        }
    }

    /// One-line human label.
    pub fn label(&self) -> String {
        let mut out = self.package_key().to_string();
        if let Some(v) = &self.version {
            out.push('@');
            out.push_str(v);
        }
        if let Some(rule) = &self.rule {
            out.push_str(&format!(" ({rule})"));
        }
        out
    }
}

/// Scan availability as reported by the scanner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    #[default]
    Complete,
    Pending,
    Failed,
    Missing,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Complete => "complete",
            ScanStatus::Pending => "pending",
            ScanStatus::Failed => "failed",
            ScanStatus::Missing => "missing",
        }
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issues for one project revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(default)]
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default)]
    pub status: ScanStatus,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl ScanResult {
    pub fn is_complete(&self) -> bool {
        self.status == ScanStatus::Complete
    }

    pub fn revision_label(&self) -> &str {
        self.revision.as_deref().unwrap_or("<unknown>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(identity: &str) -> Issue {
        Issue {
            category: Category::Licensing,
            issue_type: "policy_conflict".into(),
            identity: identity.into(),
            package: None,
            version: None,
            location: None,
            rule: None,
            title: None,
        }
    }

    #[test]
    fn package_key_strips_locator_version() {
        assert_eq!(issue("npm+lodash$4.17.20").package_key(), "npm+lodash");
        assert_eq!(issue("opaque-id").package_key(), "opaque-id");
    }

    #[test]
    fn explicit_package_wins() {
        let mut i = issue("123");
        i.package = Some("pip+requests".into());
        assert_eq!(i.package_key(), "pip+requests");
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Licensing".parse::<Category>().unwrap(), Category::Licensing);
        assert_eq!(
            "VULNERABILITY".parse::<Category>().unwrap(),
            Category::Vulnerability
        );
        assert!("quality".parse::<Category>().is_err());
    }

    #[test]
    fn issue_accepts_type_alias() {
        let i: Issue = serde_json::from_str(
            r#"{"category": "vulnerability", "type": "critical", "identity": "x"}"#,
        )
        .unwrap();
        assert_eq!(i.issue_type, "critical");
        assert_eq!(i.category, Category::Vulnerability);
    }

    #[test]
    fn scan_status_defaults_to_complete() {
        let s: ScanResult = serde_json::from_str(r#"{"project": "p", "issues": []}"#).unwrap();
        assert!(s.is_complete());
        assert_eq!(s.revision_label(), "<unknown>");
    }

    #[test]
    fn label_includes_version_and_rule() {
        let mut i = issue("npm+lodash$4.17.20");
        i.version = Some("4.17.20".into());
        i.rule = Some("GPL-3.0".into());
        assert_eq!(i.label(), "npm+lodash@4.17.20 (GPL-3.0)");
    }
}
