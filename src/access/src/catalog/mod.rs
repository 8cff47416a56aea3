//! Permission and role catalog
//!
//! Both catalogs are closed and fixed at compile time. Lookups never fail.

mod permission;
mod role;

pub use permission::Permission;
pub use role::{patron_roles, roles_granting, staff_roles, Role, RoleDescriptor, ROLE_NAMESPACE};
