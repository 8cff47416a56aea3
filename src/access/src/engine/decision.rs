//! Access decision records

use crate::catalog::{Permission, Role};
use crate::types::{ContentId, PrincipalSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Outcome of one access evaluation
///
/// Pure function result; nothing here is persisted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Unique decision identifier
    pub id: String,

    pub target: ContentId,

    pub principals: PrincipalSet,

    pub permission: Permission,

    pub granted: bool,

    /// What produced the verdict
    pub reason: DecisionReason,

    pub decided_at: DateTime<Utc>,
}

impl AccessDecision {
    pub fn new(
        target: ContentId,
        principals: PrincipalSet,
        permission: Permission,
        granted: bool,
        reason: DecisionReason,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            target,
            principals,
            permission,
            granted,
            reason,
            decided_at: Utc::now(),
        }
    }
}

/// Reason attached to a decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionReason {
    /// A caller principal is on the global allow-list
    GlobalPrincipal,

    /// A staff role held by one of the principals grants the permission
    StaffRole { role: Role },

    /// The highest-precedence patron role grants the permission
    PatronRole { role: Role },

    /// The patron role would grant the permission, but the object is embargoed
    EmbargoCapped { role: Role },

    /// The object is marked for deletion and only staff may see it
    MarkedForDeletion { role: Role },

    /// No effective role grants the permission
    NoMatchingRole,
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlobalPrincipal => write!(f, "caller holds a global principal"),
            Self::StaffRole { role } => write!(f, "granted by staff role {}", role),
            Self::PatronRole { role } => write!(f, "granted by patron role {}", role),
            Self::EmbargoCapped { role } => {
                write!(f, "patron role {} is limited to metadata while embargoed", role)
            }
            Self::MarkedForDeletion { role } => {
                write!(f, "patron role {} has no access to objects marked for deletion", role)
            }
            Self::NoMatchingRole => write!(f, "no effective role grants the permission"),
        }
    }
}
