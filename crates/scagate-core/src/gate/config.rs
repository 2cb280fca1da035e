use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::gate::bypass::AuthorizedBypass;
use crate::issues::Category;

/// Active gate modes. At least one is always set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSet {
    pub block: bool,
    pub report: bool,
}

impl ModeSet {
    pub const BLOCK: ModeSet = ModeSet {
        block: true,
        report: false,
    };
    pub const REPORT: ModeSet = ModeSet {
        block: false,
        report: true,
    };
    pub const BOTH: ModeSet = ModeSet {
        block: true,
        report: true,
    };

    pub fn is_report_only(&self) -> bool {
        self.report && !self.block
    }
}

impl fmt::Display for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.block, self.report) {
            (true, true) => f.write_str("BLOCK,REPORT"),
            (true, false) => f.write_str("BLOCK"),
            (false, true) => f.write_str("REPORT"),
            (false, false) => f.write_str("NONE"),
        }
    }
}

impl FromStr for ModeSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modes = ModeSet {
            block: false,
            report: false,
        };
        for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.to_ascii_uppercase().as_str() {
                "BLOCK" => modes.block = true,
                "REPORT" => modes.report = true,
                _ => {
                    return Err(format!(
                        "unknown gate mode `{token}` (expected BLOCK, REPORT or BLOCK,REPORT)"
                    ));
                }
            }
        }
        if !modes.block && !modes.report {
            return Err(
                "gate mode must not be empty (expected BLOCK, REPORT or BLOCK,REPORT)".into(),
            );
        }
        Ok(modes)
    }
}

/// Parse a comma-separated `block_on` list. Blank input yields an empty
/// set, which disables blocking.
pub fn parse_block_on(s: &str) -> BTreeSet<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// What to do when the base revision scan cannot be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffFallback {
    /// Evaluate every current issue as if diff mode were off.
    #[default]
    Full,
    /// Abort the gate run.
    Fail,
}

impl FromStr for DiffFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(DiffFallback::Full),
            "fail" => Ok(DiffFallback::Fail),
            other => Err(format!("unknown diff fallback `{other}` (expected full or fail)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffMode {
    #[default]
    Off,
    On {
        fallback: DiffFallback,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateConfig {
    pub category: Category,
    pub modes: ModeSet,
    pub block_on: BTreeSet<String>,
    pub diff: DiffMode,
    /// Set only after the bypass preconditions were verified.
    pub bypass: Option<AuthorizedBypass>,
}

impl GateConfig {
    /// Block mode with the category's default `block_on`.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            modes: ModeSet::BLOCK,
            block_on: category
                .default_block_on()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            diff: DiffMode::Off,
            bypass: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_and_combined_modes() {
        assert_eq!("BLOCK".parse::<ModeSet>().unwrap(), ModeSet::BLOCK);
        assert_eq!("report".parse::<ModeSet>().unwrap(), ModeSet::REPORT);
        assert_eq!("BLOCK, REPORT".parse::<ModeSet>().unwrap(), ModeSet::BOTH);
        assert_eq!("REPORT,BLOCK".parse::<ModeSet>().unwrap(), ModeSet::BOTH);
    }

    #[test]
    fn rejects_empty_and_unknown_modes() {
        assert!("".parse::<ModeSet>().is_err());
        assert!(" , ".parse::<ModeSet>().is_err());
        let err = "BLOCK,WARN".parse::<ModeSet>().unwrap_err();
        assert!(err.contains("WARN"));
    }

    #[test]
    fn mode_display_round_trips() {
        for m in [ModeSet::BLOCK, ModeSet::REPORT, ModeSet::BOTH] {
            assert_eq!(m.to_string().parse::<ModeSet>().unwrap(), m);
        }
        assert!(ModeSet::REPORT.is_report_only());
        assert!(!ModeSet::BOTH.is_report_only());
    }

    #[test]
    fn block_on_parsing_trims_and_dedups() {
        let set = parse_block_on(" critical, high,,critical ");
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["critical", "high"]);
        assert!(parse_block_on("").is_empty());
        assert!(parse_block_on("  ").is_empty());
    }

    #[test]
    fn default_config_per_category() {
        let lic = GateConfig::new(Category::Licensing);
        assert_eq!(lic.modes, ModeSet::BLOCK);
        assert!(lic.block_on.contains("policy_conflict"));

        let vuln = GateConfig::new(Category::Vulnerability);
        assert_eq!(vuln.block_on.len(), 2);
        assert_eq!(vuln.diff, DiffMode::Off);
    }

    #[test]
    fn diff_fallback_parses() {
        assert_eq!("FULL".parse::<DiffFallback>().unwrap(), DiffFallback::Full);
        assert_eq!("fail".parse::<DiffFallback>().unwrap(), DiffFallback::Fail);
        assert!("skip".parse::<DiffFallback>().is_err());
    }
}
