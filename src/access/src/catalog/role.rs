//! Role catalog
//!
//! Every role is described by exactly one static [`RoleDescriptor`]. The
//! variant of [`Role`] is the identity; the property string and predicate URI
//! are serialization forms derived from it.

use super::permission::Permission;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Namespace prefix of role predicate URIs
pub const ROLE_NAMESPACE: &str = "http://repository.example.edu/definitions/roles#";

/// Named bundle of permissions
///
/// Declaration order runs from least to most privileged, patron roles first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    None,
    CanViewMetadata,
    CanViewAccessCopies,
    CanViewOriginals,
    CanAccess,
    CanIngest,
    CanDescribe,
    CanProcess,
    CanManage,
    UnitOwner,
    Administrator,
}

/// Immutable description of a role
#[derive(Debug, PartialEq, Eq)]
pub struct RoleDescriptor {
    /// Identity of the described role
    pub role: Role,
    /// Property string, e.g. `canManage`
    pub property: &'static str,
    /// Staff roles combine by union and ignore embargo
    pub is_staff: bool,
    /// Permissions granted by the role
    pub permissions: &'static [Permission],
    /// Position among patron roles, least permissive first. `None` for staff roles.
    pub patron_rank: Option<u8>,
}

impl RoleDescriptor {
    /// Predicate URI form of this role
    pub fn uri(&self) -> String {
        format!("{}{}", ROLE_NAMESPACE, self.property)
    }
}

use Permission::*;

const VIEW_METADATA: &[Permission] = &[ViewMetadata];
const VIEW_ACCESS_COPIES: &[Permission] = &[ViewMetadata, ViewAccessCopies];
const VIEW_ORIGINALS: &[Permission] = &[ViewMetadata, ViewAccessCopies, ViewOriginal];
const ACCESS: &[Permission] = &[ViewMetadata, ViewAccessCopies, ViewOriginal, ViewHidden];
const INGEST: &[Permission] = &[ViewMetadata, ViewAccessCopies, ViewOriginal, ViewHidden, Ingest];
const DESCRIBE: &[Permission] = &[
    ViewMetadata,
    ViewAccessCopies,
    ViewOriginal,
    ViewHidden,
    EditDescription,
    BulkUpdateDescription,
];
const PROCESS: &[Permission] = &[
    ViewMetadata,
    ViewAccessCopies,
    ViewOriginal,
    ViewHidden,
    EditDescription,
    BulkUpdateDescription,
    Ingest,
    Move,
    MarkForDeletion,
    ChangePatronAccess,
    EditResourceType,
    Reindex,
    RunEnhancements,
];
const MANAGE: &[Permission] = &[
    ViewMetadata,
    ViewAccessCopies,
    ViewOriginal,
    ViewHidden,
    EditDescription,
    BulkUpdateDescription,
    Ingest,
    Move,
    MarkForDeletion,
    ChangePatronAccess,
    EditResourceType,
    Reindex,
    RunEnhancements,
    AssignStaffRoles,
    CreateCollection,
];
const UNIT_OWNER: &[Permission] = &[
    ViewMetadata,
    ViewAccessCopies,
    ViewOriginal,
    ViewHidden,
    EditDescription,
    BulkUpdateDescription,
    Ingest,
    Move,
    MarkForDeletion,
    MarkForDeletionUnit,
    ChangePatronAccess,
    EditResourceType,
    Reindex,
    RunEnhancements,
    AssignStaffRoles,
    CreateCollection,
    Destroy,
];

static DESCRIPTORS: [RoleDescriptor; 11] = [
    RoleDescriptor {
        role: Role::None,
        property: "none",
        is_staff: false,
        permissions: &[],
        patron_rank: Some(0),
    },
    RoleDescriptor {
        role: Role::CanViewMetadata,
        property: "canViewMetadata",
        is_staff: false,
        permissions: VIEW_METADATA,
        patron_rank: Some(1),
    },
    RoleDescriptor {
        role: Role::CanViewAccessCopies,
        property: "canViewAccessCopies",
        is_staff: false,
        permissions: VIEW_ACCESS_COPIES,
        patron_rank: Some(2),
    },
    RoleDescriptor {
        role: Role::CanViewOriginals,
        property: "canViewOriginals",
        is_staff: false,
        permissions: VIEW_ORIGINALS,
        patron_rank: Some(3),
    },
    RoleDescriptor {
        role: Role::CanAccess,
        property: "canAccess",
        is_staff: true,
        permissions: ACCESS,
        patron_rank: None,
    },
    RoleDescriptor {
        role: Role::CanIngest,
        property: "canIngest",
        is_staff: true,
        permissions: INGEST,
        patron_rank: None,
    },
    RoleDescriptor {
        role: Role::CanDescribe,
        property: "canDescribe",
        is_staff: true,
        permissions: DESCRIBE,
        patron_rank: None,
    },
    RoleDescriptor {
        role: Role::CanProcess,
        property: "canProcess",
        is_staff: true,
        permissions: PROCESS,
        patron_rank: None,
    },
    RoleDescriptor {
        role: Role::CanManage,
        property: "canManage",
        is_staff: true,
        permissions: MANAGE,
        patron_rank: None,
    },
    RoleDescriptor {
        role: Role::UnitOwner,
        property: "unitOwner",
        is_staff: true,
        permissions: UNIT_OWNER,
        patron_rank: None,
    },
    RoleDescriptor {
        role: Role::Administrator,
        property: "administrator",
        is_staff: true,
        permissions: &Permission::ALL,
        patron_rank: None,
    },
];

const PATRON_ROLES: [Role; 4] = [
    Role::None,
    Role::CanViewMetadata,
    Role::CanViewAccessCopies,
    Role::CanViewOriginals,
];

const STAFF_ROLES: [Role; 7] = [
    Role::CanAccess,
    Role::CanIngest,
    Role::CanDescribe,
    Role::CanProcess,
    Role::CanManage,
    Role::UnitOwner,
    Role::Administrator,
];

static ROLES_BY_PERMISSION: OnceLock<HashMap<Permission, Vec<Role>>> = OnceLock::new();

impl Role {
    /// Every role in declaration order
    pub const ALL: [Role; 11] = [
        Role::None,
        Role::CanViewMetadata,
        Role::CanViewAccessCopies,
        Role::CanViewOriginals,
        Role::CanAccess,
        Role::CanIngest,
        Role::CanDescribe,
        Role::CanProcess,
        Role::CanManage,
        Role::UnitOwner,
        Role::Administrator,
    ];

    /// Static descriptor for this role
    pub fn descriptor(self) -> &'static RoleDescriptor {
        &DESCRIPTORS[self as usize]
    }

    /// Property string, e.g. `canViewOriginals`
    pub fn property(self) -> &'static str {
        self.descriptor().property
    }

    /// Predicate URI, the property under [`ROLE_NAMESPACE`]
    pub fn uri(self) -> String {
        self.descriptor().uri()
    }

    /// Whether this is a staff role, evaluated by union and never capped
    pub fn is_staff(self) -> bool {
        self.descriptor().is_staff
    }

    /// Whether this is a patron role, evaluated by precedence
    pub fn is_patron(self) -> bool {
        !self.is_staff()
    }

    /// Permissions this role grants
    pub fn permissions(self) -> &'static [Permission] {
        self.descriptor().permissions
    }

    /// Patron precedence; `None` for staff roles
    pub fn patron_rank(self) -> Option<u8> {
        self.descriptor().patron_rank
    }

    /// Whether this role's permission set contains `permission`
    pub fn grants(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Parse a role from its predicate URI
    pub fn from_uri(uri: &str) -> Option<Self> {
        let property = uri.strip_prefix(ROLE_NAMESPACE)?;
        Self::from_property(property)
    }

    fn from_property(property: &str) -> Option<Self> {
        DESCRIPTORS.iter().find(|d| d.property == property).map(|d| d.role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.property())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Accepts either the property string or the predicate URI
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_property(s)
            .or_else(|| Self::from_uri(s))
            .ok_or_else(|| format!("Unknown role: '{}'", s))
    }
}

/// Roles whose permission set contains `permission`, in declaration order
///
/// The reverse index is built on first use and shared afterwards.
pub fn roles_granting(permission: Permission) -> &'static [Role] {
    let index = ROLES_BY_PERMISSION.get_or_init(|| {
        let mut index: HashMap<Permission, Vec<Role>> = HashMap::new();
        for role in Role::ALL {
            for &p in role.permissions() {
                index.entry(p).or_default().push(role);
            }
        }
        index
    });

    index.get(&permission).map(Vec::as_slice).unwrap_or(&[])
}

/// Staff roles in declaration order
pub fn staff_roles() -> &'static [Role] {
    &STAFF_ROLES
}

/// Patron roles ordered by precedence, least permissive first
pub fn patron_roles() -> &'static [Role] {
    &PATRON_ROLES
}
