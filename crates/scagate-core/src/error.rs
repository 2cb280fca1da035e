//! Error taxonomy for catalog loading, compilation, issue fetching,
//! diffing, bypass authorization and notification.
//!
//! Every message names the exact failing input so CI logs point at the
//! offending parameter, field, file or precondition.

use std::path::PathBuf;

/// Catalog load failures. Always fatal: no partial catalog is used.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("malformed parameter catalog {source_name}: {message}")]
    Malformed {
        source_name: String,
        message: String,
    },

    #[error(
        "malformed parameter catalog {source_name}: entry {index} ({env}): invalid `{field}`: {message}"
    )]
    InvalidEntry {
        source_name: String,
        index: usize,
        env: String,
        field: &'static str,
        message: String,
    },

    #[error(
        "duplicate parameter `{env}` in catalog {source_name} (entries {first} and {second})"
    )]
    DuplicateKey {
        source_name: String,
        env: String,
        first: usize,
        second: usize,
    },

    #[error("unknown built-in catalog `{0}` (expected builtin:sca or builtin:container)")]
    UnknownBuiltin(String),
}

/// Per-entry, non-fatal problems found while compiling arguments.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum CompileDiagnostic {
    #[error("parameter `{env}` has unknown value type `{kind}`; entry skipped")]
    UnknownValueKind { env: String, kind: String },
}

/// Failure to obtain issues from the scanner. Distinct from a valid,
/// empty result.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to read scan results from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scan results from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("scan for project `{project}` failed upstream: {message}")]
    Upstream { project: String, message: String },
}

/// Diff-mode failures. Recoverable by falling back to full evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    #[error("base revision scan `{revision}` is unavailable (status: {status})")]
    BaseRevisionUnavailable { revision: String, status: String },
}

/// Bypass precondition failures. The gate continues as if no bypass
/// had been requested.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BypassError {
    #[error("bypass requested without a justification")]
    MissingJustification,

    #[error("bypass requested without an actor identity")]
    MissingActor,

    #[error("actor `{actor}` lacks admin privilege to bypass the gate (permission: {permission})")]
    InsufficientPrivilege { actor: String, permission: String },

    #[error("permission check for actor `{actor}` failed: {message}")]
    PermissionLookup { actor: String, message: String },
}

/// A notification collaborator failed. Logged, never alters the verdict.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("{notifier} notification failed: {message}")]
    Failed {
        notifier: &'static str,
        message: String,
    },
}

/// Failures that abort a gate run before a verdict exists.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error(transparent)]
    FetchFailed(#[from] FetchError),

    #[error(transparent)]
    Diff(#[from] DiffError),
}
