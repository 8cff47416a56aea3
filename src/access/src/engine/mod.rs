//! Access decision engine
//!
//! Turns a caller's principals, a materialized ancestor chain and a requested
//! permission into a verdict. The engine performs no I/O; chains are fetched
//! beforehand by [`crate::service::AccessControlService`].
//!
//! # Algorithm
//!
//! ```text
//! principals ∩ global ≠ ∅ ──────────────────────────────► grant
//!      │
//!      ▼
//! per principal: nearest assignment in chain (target → root)
//!      │
//!      ├── staff roles ──► any grants permission? ────────► grant
//!      │
//!      └── patron roles ─► highest precedence (default none)
//!                          └─ embargo / deletion caps ─────► grant?
//! ```

pub mod decision;
pub mod metrics;
pub mod restriction;

pub use decision::{AccessDecision, DecisionReason};
pub use metrics::{EngineMetrics, MetricsCollector};
pub use restriction::{AccessRestrictions, EMBARGO_CAP};

use crate::ancestry::AncestorChain;
use crate::catalog::{Permission, Role};
use crate::global::GlobalPermissionEvaluator;
use crate::types::{ContentId, Principal, PrincipalSet};
use restriction::{patron_outcome, PatronOutcome};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Nearest-wins effective roles of every principal that has any
///
/// Principals without an assignment anywhere in the chain are absent.
pub fn effective_roles(
    chain: &AncestorChain,
    principals: &PrincipalSet,
) -> BTreeMap<Principal, BTreeSet<Role>> {
    principals
        .iter()
        .filter_map(|p| chain.nearest_roles(p).map(|roles| (p.clone(), roles)))
        .collect()
}

/// Stateless evaluator of access decisions
#[derive(Debug, Clone, Default)]
pub struct AccessDecisionEngine {
    global: GlobalPermissionEvaluator,
}

impl AccessDecisionEngine {
    /// Engine with the given global allow-list
    pub fn new(global: GlobalPermissionEvaluator) -> Self {
        Self { global }
    }

    pub fn global(&self) -> &GlobalPermissionEvaluator {
        &self.global
    }

    /// Grant for global principals, before any ancestry is consulted
    pub fn check_global(
        &self,
        target: &ContentId,
        principals: &PrincipalSet,
        permission: Permission,
    ) -> Option<AccessDecision> {
        if !self.global.has_global_principal(principals) {
            return None;
        }

        debug!("Global principal bypass for {} on {}", permission, target);
        Some(AccessDecision::new(
            target.clone(),
            principals.clone(),
            permission,
            true,
            DecisionReason::GlobalPrincipal,
        ))
    }

    /// Evaluate `permission` on the target at the end of `chain`
    pub fn evaluate(
        &self,
        chain: &AncestorChain,
        principals: &PrincipalSet,
        permission: Permission,
        restrictions: AccessRestrictions,
    ) -> AccessDecision {
        let target = chain.target();
        if let Some(decision) = self.check_global(target, principals, permission) {
            return decision;
        }

        let roles = effective_roles(chain, principals);
        debug!(
            "Effective roles on {} for {}: {:?}",
            target, principals, roles
        );

        let reason = Self::decide(&roles, permission, restrictions);
        let granted = matches!(
            reason,
            DecisionReason::StaffRole { .. } | DecisionReason::PatronRole { .. }
        );

        debug!(
            "{} {} on {}: {}",
            if granted { "GRANT" } else { "DENY" },
            permission,
            target,
            reason
        );

        AccessDecision::new(target.clone(), principals.clone(), permission, granted, reason)
    }

    fn decide(
        roles: &BTreeMap<Principal, BTreeSet<Role>>,
        permission: Permission,
        restrictions: AccessRestrictions,
    ) -> DecisionReason {
        let collected = || roles.values().flatten().copied();

        // Staff path: union over every staff role, never capped
        if let Some(role) = collected().find(|role| role.is_staff() && role.grants(permission)) {
            return DecisionReason::StaffRole { role };
        }

        // Patron path: only the highest-precedence role counts
        let patron = collected()
            .filter(|role| role.is_patron())
            .max_by_key(|role| role.patron_rank())
            .unwrap_or(Role::None);

        match patron_outcome(patron, permission, restrictions) {
            PatronOutcome::Granted => DecisionReason::PatronRole { role: patron },
            PatronOutcome::Capped => DecisionReason::EmbargoCapped { role: patron },
            PatronOutcome::Deleted => DecisionReason::MarkedForDeletion { role: patron },
            PatronOutcome::NotGranted => DecisionReason::NoMatchingRole,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ancestry::AncestorNode;

    fn engine() -> AccessDecisionEngine {
        AccessDecisionEngine::new(GlobalPermissionEvaluator::new(["repo:admins"]))
    }

    fn principals(names: &[&str]) -> PrincipalSet {
        names.iter().copied().collect()
    }

    #[test]
    fn test_global_principal_needs_no_assignments() {
        let chain = AncestorChain::new(vec![AncestorNode::new("obj")]).unwrap();
        let decision = engine().evaluate(
            &chain,
            &principals(&["repo:admins"]),
            Permission::Destroy,
            AccessRestrictions::embargoed(true),
        );

        assert!(decision.granted);
        assert_eq!(decision.reason, DecisionReason::GlobalPrincipal);
    }

    #[test]
    fn test_no_assignments_denies() {
        let chain = AncestorChain::new(vec![AncestorNode::new("obj")]).unwrap();
        let decision = engine().evaluate(
            &chain,
            &principals(&["everyone"]),
            Permission::ViewMetadata,
            AccessRestrictions::none(),
        );

        assert!(!decision.granted);
        assert_eq!(decision.reason, DecisionReason::NoMatchingRole);
    }

    #[test]
    fn test_highest_patron_role_wins_across_principals() {
        let chain = AncestorChain::new(vec![
            AncestorNode::new("collection")
                .with_assignment("everyone", Role::CanViewMetadata)
                .with_assignment("authenticated", Role::CanViewOriginals),
            AncestorNode::new("work"),
        ])
        .unwrap();

        let decision = engine().evaluate(
            &chain,
            &principals(&["everyone", "authenticated"]),
            Permission::ViewOriginal,
            AccessRestrictions::none(),
        );
        assert!(decision.granted);
        assert_eq!(
            decision.reason,
            DecisionReason::PatronRole {
                role: Role::CanViewOriginals
            }
        );

        let decision = engine().evaluate(
            &chain,
            &principals(&["everyone"]),
            Permission::ViewOriginal,
            AccessRestrictions::none(),
        );
        assert!(!decision.granted);
    }

    #[test]
    fn test_staff_roles_combine_by_union() {
        let chain = AncestorChain::new(vec![AncestorNode::new("unit")
            .with_assignment("describers", Role::CanDescribe)
            .with_assignment("ingesters", Role::CanIngest)])
        .unwrap();
        let both = principals(&["describers", "ingesters"]);

        for permission in [Permission::Ingest, Permission::EditDescription] {
            let decision = engine().evaluate(&chain, &both, permission, AccessRestrictions::none());
            assert!(decision.granted, "{} should be granted", permission);
        }

        let decision = engine().evaluate(&chain, &both, Permission::Move, AccessRestrictions::none());
        assert!(!decision.granted);
    }

    #[test]
    fn test_effective_roles() {
        let chain = AncestorChain::new(vec![
            AncestorNode::new("unit").with_assignment("everyone", Role::CanViewOriginals),
            AncestorNode::new("collection").with_assignment("everyone", Role::CanViewMetadata),
            AncestorNode::new("work").with_assignment("staff", Role::CanAccess),
        ])
        .unwrap();

        let roles = effective_roles(&chain, &principals(&["everyone", "staff", "nobody"]));
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[&Principal::everyone()], BTreeSet::from([Role::CanViewMetadata]));
        assert_eq!(roles[&Principal::new("staff")], BTreeSet::from([Role::CanAccess]));
    }

    #[test]
    fn test_one_principal_holds_disjoint_staff_roles_on_one_node() {
        let chain = AncestorChain::new(vec![AncestorNode::new("collection")
            .with_assignment("grp", Role::CanIngest)
            .with_assignment("grp", Role::CanDescribe)])
        .unwrap();
        let grp = principals(&["grp"]);

        let ingest = engine().evaluate(&chain, &grp, Permission::Ingest, AccessRestrictions::none());
        assert!(ingest.granted);
        assert_eq!(ingest.reason, DecisionReason::StaffRole { role: Role::CanIngest });

        let describe =
            engine().evaluate(&chain, &grp, Permission::EditDescription, AccessRestrictions::none());
        assert!(describe.granted);
        assert_eq!(describe.reason, DecisionReason::StaffRole { role: Role::CanDescribe });
    }

    #[test]
    fn test_nearest_level_shadows_farther_as_a_whole() {
        let chain = AncestorChain::new(vec![
            AncestorNode::new("unit").with_assignment("grp", Role::CanManage),
            AncestorNode::new("work")
                .with_assignment("grp", Role::CanViewAccessCopies)
                .with_assignment("grp", Role::CanViewMetadata),
        ])
        .unwrap();
        let grp = principals(&["grp"]);

        let moved = engine().evaluate(&chain, &grp, Permission::Move, AccessRestrictions::none());
        assert!(!moved.granted);

        let copies =
            engine().evaluate(&chain, &grp, Permission::ViewAccessCopies, AccessRestrictions::none());
        assert!(copies.granted);
        assert_eq!(
            copies.reason,
            DecisionReason::PatronRole {
                role: Role::CanViewAccessCopies
            }
        );
    }

    #[test]
    fn test_deletion_mark_leaves_staff_untouched() {
        let chain = AncestorChain::new(vec![AncestorNode::new("work")
            .with_assignment("everyone", Role::CanViewOriginals)
            .with_assignment("staff", Role::CanAccess)])
        .unwrap();
        let restrictions = AccessRestrictions::none().with_marked_for_deletion(true);

        let patron = engine().evaluate(
            &chain,
            &principals(&["everyone"]),
            Permission::ViewMetadata,
            restrictions,
        );
        assert!(!patron.granted);
        assert_eq!(
            patron.reason,
            DecisionReason::MarkedForDeletion {
                role: Role::CanViewOriginals
            }
        );

        let staff = engine().evaluate(
            &chain,
            &principals(&["staff"]),
            Permission::ViewOriginal,
            restrictions,
        );
        assert!(staff.granted);
    }
}
