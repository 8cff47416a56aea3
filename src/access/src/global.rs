//! Global principals that bypass tree-based evaluation

use crate::config::GlobalSection;
use crate::types::{Principal, PrincipalSet};
use std::collections::BTreeSet;
use tracing::info;

/// Static allow-list of superuser principals
///
/// Loaded once at startup; immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct GlobalPermissionEvaluator {
    principals: BTreeSet<Principal>,
}

impl GlobalPermissionEvaluator {
    /// Evaluator over a fixed set of global principals
    pub fn new<I, P>(principals: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Principal>,
    {
        let principals: BTreeSet<Principal> = principals.into_iter().map(Into::into).collect();
        info!("Global permission evaluator configured with {} principals", principals.len());
        Self { principals }
    }

    /// Evaluator over the configured principals
    pub fn from_config(section: &GlobalSection) -> Self {
        Self::new(section.principals.iter().map(String::as_str))
    }

    /// Whether any of `principals` is a global principal
    pub fn has_global_principal(&self, principals: &PrincipalSet) -> bool {
        principals.intersects(&self.principals)
    }

    /// Configured global principals
    pub fn global_principals(&self) -> &BTreeSet<Principal> {
        &self.principals
    }
}
