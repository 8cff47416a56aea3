//! Shared fixtures for access control integration tests

#![allow(dead_code)]

use repo_access::{
    AccessControlService, AccessDecisionEngine, ContentId, GlobalPermissionEvaluator,
    InMemoryAncestryProvider, PrincipalSet, Role,
};
use std::sync::Arc;

pub const ADMINS: &str = "repo:admins";

/// Install a test subscriber once; honours RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn principals(names: &[&str]) -> PrincipalSet {
    names.iter().copied().collect()
}

pub fn id(name: &str) -> ContentId {
    ContentId::new(name)
}

/// root → unit → collection → work → file
///
/// - unit: everyone → canViewMetadata
/// - collection: staffGrp → canManage
/// - file: no assignments
pub fn repository_tree() -> Arc<InMemoryAncestryProvider> {
    let tree = Arc::new(InMemoryAncestryProvider::new());
    tree.add_root("root");
    tree.add_child("root", "unit").unwrap();
    tree.add_child("unit", "collection").unwrap();
    tree.add_child("collection", "work").unwrap();
    tree.add_child("work", "file").unwrap();

    tree.assign(&id("unit"), "everyone", Role::CanViewMetadata).unwrap();
    tree.assign(&id("collection"), "staffGrp", Role::CanManage).unwrap();
    tree
}

pub fn service(tree: Arc<InMemoryAncestryProvider>) -> AccessControlService {
    init_tracing();
    let engine = AccessDecisionEngine::new(GlobalPermissionEvaluator::new([ADMINS]));
    AccessControlService::new(engine, tree)
}
