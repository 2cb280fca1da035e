pub mod bypass;
pub mod config;
pub mod engine;
pub mod notify;

pub use bypass::{
    ActorPermission, AuthorizedBypass, BypassRequest, PermissionCheck, authorize_bypass,
};
pub use config::{DiffFallback, DiffMode, GateConfig, ModeSet, parse_block_on};
pub use engine::{GateVerdict, Outcome, evaluate};

/// Process exit codes of a gate run.
pub mod exit_codes {
    /// Pass, bypassed pass, or Report-only with blocking issues.
    pub const PASS: i32 = 0;
    /// Tooling or infrastructure failure, not a policy decision.
    pub const INFRA: i32 = 1;
    /// Block mode with unresolved blocking issues.
    pub const POLICY: i32 = 2;
}
