//! Emergency bypass authorization.
//!
//! A bypass forces a passing verdict, so it is only granted to an actor
//! with admin permission and only with a written justification. The
//! check runs before the gate engine; on any failure the caller proceeds
//! without a bypass.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BypassError;

/// Repository permission level of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorPermission {
    None,
    Read,
    Triage,
    Write,
    Maintain,
    Admin,
}

impl ActorPermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorPermission::None => "none",
            ActorPermission::Read => "read",
            ActorPermission::Triage => "triage",
            ActorPermission::Write => "write",
            ActorPermission::Maintain => "maintain",
            ActorPermission::Admin => "admin",
        }
    }
}

impl fmt::Display for ActorPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorPermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(ActorPermission::None),
            "read" | "pull" => Ok(ActorPermission::Read),
            "triage" => Ok(ActorPermission::Triage),
            "write" | "push" => Ok(ActorPermission::Write),
            "maintain" => Ok(ActorPermission::Maintain),
            "admin" => Ok(ActorPermission::Admin),
            other => Err(format!("unknown permission level `{other}`")),
        }
    }
}

/// Looks up an actor's permission. Implemented by whatever already knows
/// the answer (a prior workflow step, an API client).
pub trait PermissionCheck {
    fn permission(&self, actor: &str) -> Result<ActorPermission, String>;
}

/// A permission resolved ahead of time, e.g. passed in by the workflow.
impl PermissionCheck for ActorPermission {
    fn permission(&self, _actor: &str) -> Result<ActorPermission, String> {
        Ok(*self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BypassRequest {
    pub actor: Option<String>,
    pub justification: Option<String>,
}

/// A bypass whose preconditions were verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedBypass {
    pub actor: String,
    pub justification: String,
}

pub fn authorize_bypass(
    request: &BypassRequest,
    checker: &dyn PermissionCheck,
) -> Result<AuthorizedBypass, BypassError> {
    // Blank means absent; otherwise the text is recorded exactly as given.
    let justification = request
        .justification
        .as_deref()
        .filter(|j| !j.trim().is_empty())
        .ok_or(BypassError::MissingJustification)?;

    let actor = request
        .actor
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or(BypassError::MissingActor)?;

    let permission = checker
        .permission(actor)
        .map_err(|message| BypassError::PermissionLookup {
            actor: actor.to_string(),
            message,
        })?;

    if permission != ActorPermission::Admin {
        return Err(BypassError::InsufficientPrivilege {
            actor: actor.to_string(),
            permission: permission.to_string(),
        });
    }

    info!(actor, "gate bypass authorized");
    Ok(AuthorizedBypass {
        actor: actor.to_string(),
        justification: justification.to_string(),
    })
}
