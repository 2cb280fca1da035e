//! Argument compiler.
//!
//! Turns a parameter catalog plus an explicit environment mapping into
//! the ordered argv tokens appended to a scanner sub-command.
//!
//! Guarantees:
//! - Tokens follow catalog declaration order; identical inputs always
//!   produce identical tokens.
//! - Missing variables are treated as empty, never as errors.
//! - An entry with an unrecognized value type is skipped and reported as
//!   a diagnostic; the remaining entries still compile.
//!
//! The compiler performs no I/O. Reading the process environment is the
//! caller's job (see [`process_env`]).

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, ParameterSpec, ValueKind};
use crate::error::CompileDiagnostic;

/// Variable bindings visible to the compiler.
pub type Env = BTreeMap<String, String>;

/// Snapshot the current process environment.
pub fn process_env() -> Env {
    std::env::vars().collect()
}

/// Literal argv tokens for one scanner invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompiledArguments {
    pub tokens: Vec<String>,
}

impl CompiledArguments {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Space-joined, POSIX-shell-quoted form for appending to a command line.
    pub fn to_command_line(&self) -> String {
        self.tokens
            .iter()
            .map(|t| shell_escape::unix::escape(Cow::Borrowed(t.as_str())))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What a single enabled parameter contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub env_name: String,
    pub flag: String,
    pub values: Vec<String>,
}

/// Full result of one compilation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Compilation {
    pub arguments: CompiledArguments,
    /// Enabled action-only parameters, in catalog order.
    pub actions: Vec<String>,
    /// Per-parameter record of what was enabled and with which values.
    pub trace: Vec<TraceEntry>,
    pub diagnostics: Vec<CompileDiagnostic>,
}

impl Compilation {
    pub fn action_enabled(&self, env_name: &str) -> bool {
        self.actions.iter().any(|a| a == env_name)
    }
}

/// Compile `catalog` against `env`, optionally restricted to the
/// parameters accepted by `command_filter`.
pub fn compile(catalog: &Catalog, env: &Env, command_filter: Option<&str>) -> Compilation {
    let mut out = Compilation::default();

    for spec in catalog.specs() {
        if !spec.applies_to(command_filter) {
            debug!(
                param = %spec.env_name,
                command = command_filter.unwrap_or_default(),
                "parameter not applicable to command"
            );
            continue;
        }

        let raw = env.get(&spec.env_name).map(String::as_str).unwrap_or("");

        match &spec.value_kind {
            ValueKind::Flag => {
                if !raw.eq_ignore_ascii_case("true") {
                    continue;
                }
                if spec.is_action_only() {
                    info!(param = %spec.env_name, "action enabled");
                    out.actions.push(spec.env_name.clone());
                    continue;
                }
                emit(&mut out, spec, Vec::new());
            }
            ValueKind::Value => {
                let value = raw.trim();
                if value.is_empty() {
                    continue;
                }
                emit(&mut out, spec, vec![value.to_string()]);
            }
            ValueKind::MultiValue => {
                let values: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect();
                if values.is_empty() {
                    continue;
                }
                emit(&mut out, spec, values);
            }
            ValueKind::Unrecognized(kind) => {
                warn!(param = %spec.env_name, kind = %kind, "unknown parameter type, skipping");
                out.diagnostics.push(CompileDiagnostic::UnknownValueKind {
                    env: spec.env_name.clone(),
                    kind: kind.clone(),
                });
            }
        }
    }

    out
}

fn emit(out: &mut Compilation, spec: &ParameterSpec, values: Vec<String>) {
    if values.is_empty() {
        info!(param = %spec.env_name, flag = %spec.flag, "enabled");
        out.arguments.tokens.push(spec.flag.clone());
    } else {
        info!(
            param = %spec.env_name,
            flag = %spec.flag,
            values = %values.join(", "),
            "enabled"
        );
        for value in &values {
            out.arguments.tokens.push(spec.flag.clone());
            out.arguments.tokens.push(value.clone());
        }
    }

    out.trace.push(TraceEntry {
        env_name: spec.env_name.clone(),
        flag: spec.flag.clone(),
        values,
    });
}
