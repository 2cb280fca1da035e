use crate::gate::{GateConfig, GateVerdict, Outcome};
use crate::issues::{Category, Issue, MatchTier};

/// Render the Markdown summary for a verdict.
///
/// Every evaluated issue is listed, whatever the outcome.
pub fn render_summary(verdict: &GateVerdict, config: &GateConfig) -> String {
    let mut out = String::new();

    let category = match verdict.category {
        Category::Licensing => "Licensing",
        Category::Vulnerability => "Vulnerability",
    };
    let headline = match verdict.outcome {
        Outcome::Pass => "PASSED",
        Outcome::Fail => "FAILED",
        Outcome::ReportedFail => "FAILED (report only)",
        Outcome::BypassedPass => "BYPASSED",
    };
    out.push_str(&format!("## {category} gate: {headline}\n\n"));

    let block_on = if config.block_on.is_empty() {
        "(none, blocking disabled)".to_string()
    } else {
        config
            .block_on
            .iter()
            .map(|t| format!("`{t}`"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    out.push_str(&format!(
        "**Mode:** {} | **Block on:** {} | **Exit code:** {}\n\n",
        config.modes, block_on, verdict.exit_code
    ));

    let blocking = verdict.blocking_issues.len();
    match verdict.outcome {
        Outcome::Pass => out.push_str("No blocking issues found.\n"),
        Outcome::Fail => out.push_str(&format!(
            "{blocking} blocking issue(s) found. The build fails.\n"
        )),
        Outcome::ReportedFail => out.push_str(&format!(
            "{blocking} issue(s) blocking per policy, reporting only — build passes.\n"
        )),
        Outcome::BypassedPass => {
            if let Some(bypass) = &verdict.bypass {
                out.push_str(&format!(
                    "Gate bypassed by `{}` with {blocking} blocking issue(s) outstanding.\n\n",
                    bypass.actor
                ));
                out.push_str("**Justification:**\n\n");
                push_verbatim(&mut out, &bypass.justification);
            }
        }
    }

    if let Some(diff) = &verdict.diff {
        out.push_str(&format!(
            "\nCompared against base revision `{}`: {} new, {} pre-existing",
            diff.base_revision.as_deref().unwrap_or("<unknown>"),
            diff.new.len(),
            diff.persisted.len(),
        ));
        let degraded = diff.degraded_matches();
        if degraded > 0 {
            out.push_str(&format!(" ({degraded} matched by package)"));
        }
        out.push_str(".\n");
    }

    for note in &verdict.notes {
        out.push_str(&format!("\n> **Note:** {note}\n"));
    }

    if verdict.out_of_category > 0 {
        out.push_str(&format!(
            "\n{} issue(s) from other categories were not evaluated.\n",
            verdict.out_of_category
        ));
    }

    let diff_on = verdict.diff.is_some();
    if !verdict.blocking_issues.is_empty() {
        out.push_str("\n### Blocking issues\n\n");
        let statuses = diff_on.then(|| vec!["new"; verdict.blocking_issues.len()]);
        push_table(&mut out, &verdict.blocking_issues, statuses.as_deref());
    }
    if !verdict.informational_issues.is_empty() {
        out.push_str("\n### Informational issues\n\n");
        let statuses = diff_on.then(|| {
            verdict
                .informational_matches
                .iter()
                .map(|m| match m {
                    None => "new",
                    Some(MatchTier::Exact) => "existing",
                    Some(MatchTier::Degraded) => "existing (by package)",
                })
                .collect::<Vec<_>>()
        });
        push_table(&mut out, &verdict.informational_issues, statuses.as_deref());
    }

    out
}

/// Writes `text` unaltered inside a fenced block. The fence is longer
/// than any backtick run in `text` so it cannot be closed early.
fn push_verbatim(out: &mut String, text: &str) {
    let longest_run = text
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    out.push_str(&format!("{fence}text\n{text}"));
    if !text.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!("{fence}\n"));
}

fn push_table(out: &mut String, issues: &[Issue], statuses: Option<&[&str]>) {
    if statuses.is_some() {
        out.push_str("| Type | Package | Version | Rule | Title | Status |\n");
        out.push_str("|---|---|---|---|---|---|\n");
    } else {
        out.push_str("| Type | Package | Version | Rule | Title |\n");
        out.push_str("|---|---|---|---|---|\n");
    }
    for (i, issue) in issues.iter().enumerate() {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |",
            cell(&issue.issue_type),
            cell(issue.package_key()),
            cell(issue.version.as_deref().unwrap_or("")),
            cell(issue.rule.as_deref().unwrap_or("")),
            cell(issue.title.as_deref().unwrap_or("")),
        ));
        if let Some(s) = statuses.and_then(|s| s.get(i)) {
            out.push_str(&format!(" {s} |"));
        }
        out.push('\n');
    }
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
