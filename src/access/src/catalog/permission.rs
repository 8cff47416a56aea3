//! Fine-grained capabilities checked against content objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A capability that can be requested on a content object
///
/// The set is closed; roles are fixed bundles of these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    ViewMetadata,
    ViewAccessCopies,
    ViewOriginal,
    /// See objects hidden from patrons
    ViewHidden,
    EditDescription,
    BulkUpdateDescription,
    Ingest,
    Move,
    MarkForDeletion,
    MarkForDeletionUnit,
    Destroy,
    DestroyUnit,
    CreateCollection,
    CreateAdminUnit,
    ChangePatronAccess,
    EditResourceType,
    AssignStaffRoles,
    Reindex,
    RunEnhancements,
}

impl Permission {
    /// Every permission in declaration order
    pub const ALL: [Permission; 19] = [
        Permission::ViewMetadata,
        Permission::ViewAccessCopies,
        Permission::ViewOriginal,
        Permission::ViewHidden,
        Permission::EditDescription,
        Permission::BulkUpdateDescription,
        Permission::Ingest,
        Permission::Move,
        Permission::MarkForDeletion,
        Permission::MarkForDeletionUnit,
        Permission::Destroy,
        Permission::DestroyUnit,
        Permission::CreateCollection,
        Permission::CreateAdminUnit,
        Permission::ChangePatronAccess,
        Permission::EditResourceType,
        Permission::AssignStaffRoles,
        Permission::Reindex,
        Permission::RunEnhancements,
    ];

    /// Property name used when the permission is serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewMetadata => "viewMetadata",
            Self::ViewAccessCopies => "viewAccessCopies",
            Self::ViewOriginal => "viewOriginal",
            Self::ViewHidden => "viewHidden",
            Self::EditDescription => "editDescription",
            Self::BulkUpdateDescription => "bulkUpdateDescription",
            Self::Ingest => "ingest",
            Self::Move => "move",
            Self::MarkForDeletion => "markForDeletion",
            Self::MarkForDeletionUnit => "markForDeletionUnit",
            Self::Destroy => "destroy",
            Self::DestroyUnit => "destroyUnit",
            Self::CreateCollection => "createCollection",
            Self::CreateAdminUnit => "createAdminUnit",
            Self::ChangePatronAccess => "changePatronAccess",
            Self::EditResourceType => "editResourceType",
            Self::AssignStaffRoles => "assignStaffRoles",
            Self::Reindex => "reindex",
            Self::RunEnhancements => "runEnhancements",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown permission: '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde() {
        for permission in Permission::ALL {
            let json = serde_json::to_string(&permission).unwrap();
            assert_eq!(json, format!("\"{}\"", permission));
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("viewOriginal".parse::<Permission>(), Ok(Permission::ViewOriginal));
        assert_eq!("move".parse::<Permission>(), Ok(Permission::Move));
        assert!("viewEverything".parse::<Permission>().is_err());
    }
}
