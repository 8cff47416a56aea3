//! Object-level overrides that narrow patron access

use crate::catalog::{Permission, Role};
use serde::{Deserialize, Serialize};

/// Role whose permission set bounds patrons while an object is embargoed
pub const EMBARGO_CAP: Role = Role::CanViewMetadata;

/// Status flags of the target object, supplied by the caller
///
/// Staff roles are never affected by these flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRestrictions {
    /// Patron permissions are capped to [`EMBARGO_CAP`]
    #[serde(default)]
    pub embargoed: bool,

    /// Patron roles grant nothing
    #[serde(default)]
    pub marked_for_deletion: bool,
}

impl AccessRestrictions {
    /// No restrictions
    pub fn none() -> Self {
        Self::default()
    }

    /// Only the embargo flag set
    pub fn embargoed(embargoed: bool) -> Self {
        Self {
            embargoed,
            ..Self::default()
        }
    }

    /// Set the deletion mark
    pub fn with_marked_for_deletion(mut self, marked: bool) -> Self {
        self.marked_for_deletion = marked;
        self
    }
}

/// Result of applying restrictions to a patron role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PatronOutcome {
    Granted,
    NotGranted,
    Capped,
    Deleted,
}

/// Apply restrictions to the patron path for `role`
pub(crate) fn patron_outcome(
    role: Role,
    permission: Permission,
    restrictions: AccessRestrictions,
) -> PatronOutcome {
    if !role.grants(permission) {
        return PatronOutcome::NotGranted;
    }
    if restrictions.marked_for_deletion {
        return PatronOutcome::Deleted;
    }
    if restrictions.embargoed && !EMBARGO_CAP.grants(permission) {
        return PatronOutcome::Capped;
    }
    PatronOutcome::Granted
}
