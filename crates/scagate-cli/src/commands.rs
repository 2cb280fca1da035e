use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use scagate_core::catalog::{self, render::render_markdown};
use scagate_core::compile::{compile as compile_args, process_env};
use scagate_core::gate::notify::{Notifier, StepOutputNotifier, StepSummaryNotifier, dispatch};
use scagate_core::gate::{
    ActorPermission, BypassRequest, DiffMode, GateConfig, authorize_bypass, exit_codes,
    parse_block_on,
};
use scagate_core::issues::{IssueQuery, IssueSource, JsonFileSource};
use scagate_core::report::model::{CompileReport, GateReport, ScanInfo, ToolInfo};
use scagate_core::report::render::render_summary;
use scagate_core::{GateInputs, run_gate};

use crate::args::{CatalogArgs, CatalogFormat, CompileArgs, CompileFormat, GateArgs, GateFormat};

fn write_output(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("failed to write output: {}", path.display())),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}

pub fn compile(args: CompileArgs, tool: ToolInfo) -> Result<i32> {
    let catalog = catalog::resolve(&args.catalog)?;
    let env = process_env();
    let command = args.command.filter(|c| !c.is_empty());

    let compilation = compile_args(&catalog, &env, command.as_deref());

    if args.strict && !compilation.diagnostics.is_empty() {
        let messages: Vec<String> = compilation
            .diagnostics
            .iter()
            .map(|d| d.to_string())
            .collect();
        bail!(
            "catalog {} has invalid parameters: {}",
            catalog.source_name,
            messages.join("; ")
        );
    }

    let report = CompileReport::new(tool, catalog.info(), command, compilation);

    if let Some(path) = &args.github_output {
        let skip_test = report
            .compilation
            .actions
            .iter()
            .any(|a| a.ends_with("_SKIP_TEST"));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open step output file: {}", path.display()))?;
        writeln!(file, "args={}", report.command_line)?;
        writeln!(file, "actions={}", report.compilation.actions.join(","))?;
        writeln!(file, "skip_test={skip_test}")?;
    }

    let output = match args.format {
        CompileFormat::Args => format!("{}\n", report.command_line),
        CompileFormat::Json => serde_json::to_string_pretty(&report)?,
    };
    write_output(None, &output)?;

    Ok(exit_codes::PASS)
}

pub fn gate(args: GateArgs, tool: ToolInfo) -> Result<i32> {
    let block_on = match args.block_on.as_deref().map(str::trim) {
        None => args
            .category
            .default_block_on()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        Some(s) if s.eq_ignore_ascii_case("none") => Default::default(),
        Some(s) => parse_block_on(s),
    };

    let mut notes = Vec::new();
    let bypass = if args.bypass {
        let request = BypassRequest {
            actor: args.actor.clone(),
            justification: args.justification.clone(),
        };
        let permission = args.actor_permission.unwrap_or(ActorPermission::None);
        match authorize_bypass(&request, &permission) {
            Ok(b) => Some(b),
            Err(e) => {
                warn!(error = %e, "bypass denied, applying normal gate rules");
                notes.push(format!("Bypass requested but denied: {e}."));
                None
            }
        }
    } else {
        None
    };

    let config = GateConfig {
        category: args.category,
        modes: args.mode,
        block_on,
        diff: if args.diff {
            DiffMode::On {
                fallback: args.diff_fallback,
            }
        } else {
            DiffMode::Off
        },
        bypass,
    };

    let current = JsonFileSource::new(&args.issues);
    let base = args.base.as_ref().map(JsonFileSource::new);
    let inputs = GateInputs {
        current: &current,
        current_query: IssueQuery::default(),
        base: base.as_ref().map(|b| b as &dyn IssueSource),
        base_query: IssueQuery {
            project: None,
            revision: args.base_revision.clone(),
        },
    };

    let (scan, mut verdict) = run_gate(&config, &inputs)
        .with_context(|| format!("gate evaluation aborted for {}", args.issues.display()))?;

    if !notes.is_empty() {
        verdict.notes.extend(notes);
        verdict.summary_text = render_summary(&verdict, &config);
    }

    let summary = args.step_summary.clone().map(|path| StepSummaryNotifier { path });
    let outputs = args.github_output.clone().map(|path| StepOutputNotifier { path });
    let mut notifiers: Vec<&dyn Notifier> = Vec::new();
    if let Some(n) = &summary {
        notifiers.push(n);
    }
    if let Some(n) = &outputs {
        notifiers.push(n);
    }
    let failures = dispatch(&verdict, &notifiers);
    if !failures.is_empty() {
        info!(
            failed = failures.len(),
            "continuing despite notification failures"
        );
    }

    let exit_code = verdict.exit_code;
    let output = match args.format {
        GateFormat::Markdown => verdict.summary_text.clone(),
        GateFormat::Json => {
            let report = GateReport::new(
                tool,
                ScanInfo {
                    project: scan.project,
                    revision: scan.revision,
                },
                config,
                verdict,
            );
            serde_json::to_string_pretty(&report)?
        }
    };
    write_output(args.out.as_deref(), &output)?;

    Ok(exit_code)
}

pub fn catalog(args: CatalogArgs) -> Result<i32> {
    let catalog = catalog::resolve(&args.catalog)?;
    let output = match args.format {
        CatalogFormat::Markdown => render_markdown(&catalog),
        CatalogFormat::Json => serde_json::to_string_pretty(&catalog)?,
    };
    write_output(None, &output)?;
    Ok(exit_codes::PASS)
}
