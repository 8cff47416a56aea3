//! Error types for the access control engine

use crate::catalog::Permission;
use crate::types::ContentId;
use thiserror::Error;

/// Failures reported by an ancestry provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AncestryError {
    /// The requested object does not exist
    #[error("Object not found: {0}")]
    NotFound(ContentId),

    /// An ancestor link points at an object that no longer exists
    #[error("Object {id} is orphaned: parent {missing_parent} does not exist")]
    Orphaned {
        id: ContentId,
        missing_parent: ContentId,
    },

    /// Parent links loop back onto themselves
    #[error("Ancestry of {0} contains a cycle")]
    Cycle(ContentId),

    /// The provider produced a chain that cannot be evaluated
    #[error("Invalid ancestor chain: {0}")]
    InvalidChain(String),
}

/// Access control errors
#[derive(Debug, Error)]
pub enum AccessError {
    /// Requested permission was not granted
    #[error("{message}: {permission} denied on {target} ({reason})")]
    AccessDenied {
        message: String,
        target: ContentId,
        permission: Permission,
        reason: String,
    },

    /// Ancestry could not be resolved, no safe verdict exists
    #[error("Ancestry unavailable: {0}")]
    AncestryUnavailable(#[from] AncestryError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AccessError {
    /// True for an ordinary authorization refusal, false for integrity or input failures
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }
}

/// Result type for access control operations
pub type Result<T> = std::result::Result<T, AccessError>;
