use serde::{Deserialize, Serialize};

use crate::SCHEMA_VERSION;
use crate::catalog::CatalogInfo;
use crate::compile::Compilation;
use crate::gate::{GateConfig, GateVerdict};

/// Tool metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
    pub commit: Option<String>,
}

/// JSON output of `scagate compile`.
#[derive(Debug, Clone, Serialize)]
pub struct CompileReport {
    pub schema_version: String,
    pub tool: ToolInfo,
    pub catalog: CatalogInfo,
    pub command: Option<String>,
    /// Shell-ready form of `compilation.arguments.tokens`.
    pub command_line: String,
    pub compilation: Compilation,
}

impl CompileReport {
    pub fn new(
        tool: ToolInfo,
        catalog: CatalogInfo,
        command: Option<String>,
        compilation: Compilation,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tool,
            catalog,
            command,
            command_line: compilation.arguments.to_command_line(),
            compilation,
        }
    }
}

/// Scan the verdict was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanInfo {
    pub project: String,
    pub revision: Option<String>,
}

/// JSON output of `scagate gate`.
///
/// Stable for identical inputs: issue order follows the scan document.
#[derive(Debug, Clone, Serialize)]
pub struct GateReport {
    pub schema_version: String,
    pub tool: ToolInfo,
    pub scan: ScanInfo,
    pub config: GateConfig,
    pub verdict: GateVerdict,
}

impl GateReport {
    pub fn new(tool: ToolInfo, scan: ScanInfo, config: GateConfig, verdict: GateVerdict) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tool,
            scan,
            config,
            verdict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin;
    use crate::compile::{Env, compile};
    use crate::gate::evaluate;
    use crate::issues::{Category, Issue};

    fn tool() -> ToolInfo {
        ToolInfo {
            name: "scagate".into(),
            version: "1.0.0".into(),
            commit: None,
        }
    }

    #[test]
    fn compile_report_carries_command_line() {
        let catalog = builtin::load("sca").unwrap();
        let env: Env = [("SCA_FOSSA_BRANCH".to_string(), "main".to_string())]
            .into_iter()
            .collect();
        let report = CompileReport::new(
            tool(),
            catalog.info(),
            Some("analyze".into()),
            compile(&catalog, &env, Some("analyze")),
        );
        assert_eq!(report.command_line, "--branch main");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["schema_version"], SCHEMA_VERSION);
        assert_eq!(json["catalog"]["source"], "builtin:sca");
        assert_eq!(
            json["compilation"]["arguments"]["tokens"],
            serde_json::json!(["--branch", "main"])
        );
    }

    #[test]
    fn gate_report_serializes_outcome_and_modes() {
        let config = GateConfig::new(Category::Licensing);
        let issues = vec![Issue {
            category: Category::Licensing,
            issue_type: "policy_conflict".into(),
            identity: "npm+a$1".into(),
            package: None,
            version: None,
            location: None,
            rule: None,
            title: None,
        }];
        let verdict = evaluate(&config, &issues, None).unwrap();
        let report = GateReport::new(
            tool(),
            ScanInfo {
                project: "p".into(),
                revision: Some("r".into()),
            },
            config,
            verdict,
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["verdict"]["outcome"], "fail");
        assert_eq!(json["verdict"]["exit_code"], 2);
        assert_eq!(json["config"]["modes"]["block"], true);
        assert_eq!(json["config"]["category"], "licensing");
        assert!(json["verdict"].get("bypass").is_none());
    }
}
