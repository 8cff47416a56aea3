//! # Repository Access Control
//!
//! Hierarchical role-based access control for a digital repository's
//! content tree.
//!
//! ## Features
//!
//! - **Closed catalogs** of permissions and staff/patron roles
//! - **Nearest-wins inheritance** of role assignments down an ancestor chain
//! - **Global principals** that bypass tree evaluation
//! - **Embargo and deletion overrides** that narrow patron access only
//! - **Search filters** derived from a caller's principals
//!
//! ## Example
//!
//! ```rust
//! use repo_access::{
//!     AccessControlService, AccessDecisionEngine, ContentId, InMemoryAncestryProvider,
//!     Permission, PrincipalSet, Role,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tree = Arc::new(InMemoryAncestryProvider::new());
//!     tree.add_root("unit");
//!     tree.add_child("unit", "work")?;
//!     tree.assign(&ContentId::new("unit"), "everyone", Role::CanViewMetadata)?;
//!
//!     let service = AccessControlService::new(AccessDecisionEngine::default(), tree);
//!     let everyone = PrincipalSet::new().with("everyone");
//!     let work = ContentId::new("work");
//!
//!     assert!(service.has_access(&work, &everyone, Permission::ViewMetadata, false).await);
//!     assert!(!service.has_access(&work, &everyone, Permission::ViewOriginal, false).await);
//!     Ok(())
//! }
//! ```

pub mod ancestry;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod global;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use ancestry::{AncestorChain, AncestorNode, AncestryProvider, InMemoryAncestryProvider};
pub use catalog::{patron_roles, roles_granting, staff_roles, Permission, Role, RoleDescriptor};
pub use config::AccessConfig;
pub use engine::{effective_roles, AccessDecision, AccessDecisionEngine, AccessRestrictions, DecisionReason};
pub use error::{AccessError, AncestryError, Result};
pub use filter::{AccessFilterBuilder, FilterExpression};
pub use global::GlobalPermissionEvaluator;
pub use service::AccessControlService;
pub use types::{ContentId, Principal, PrincipalSet, RoleAssignment};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
