//! Ancestor chains and the providers that supply them
//!
//! A chain runs from the root of the content tree down to the target object,
//! inclusive. Each node carries only its own explicit role assignments;
//! inheritance is resolved by [`AncestorChain::nearest_roles`].

mod memory;

pub use memory::InMemoryAncestryProvider;

use crate::catalog::Role;
use crate::error::AncestryError;
use crate::types::{ContentId, Principal, RoleAssignment};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One level of an ancestor chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorNode {
    pub id: ContentId,
    #[serde(default)]
    pub assignments: Vec<RoleAssignment>,
}

impl AncestorNode {
    /// Node with no assignments
    pub fn new(id: impl Into<ContentId>) -> Self {
        Self {
            id: id.into(),
            assignments: Vec::new(),
        }
    }

    /// Add an assignment to this node
    pub fn with_assignment(mut self, principal: impl Into<Principal>, role: Role) -> Self {
        self.assignments.push(RoleAssignment::new(principal, role));
        self
    }

    /// Every role assigned to `principal` at this node
    ///
    /// Empty when the node has no assignment for `principal`.
    pub fn roles_for(&self, principal: &Principal) -> BTreeSet<Role> {
        self.assignments
            .iter()
            .filter(|a| &a.principal == principal)
            .map(|a| a.role)
            .collect()
    }
}

/// Root-to-target path through the content tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AncestorNode>", into = "Vec<AncestorNode>")]
pub struct AncestorChain {
    nodes: Vec<AncestorNode>,
}

impl AncestorChain {
    /// Build a chain from nodes ordered root first
    pub fn new(nodes: Vec<AncestorNode>) -> Result<Self, AncestryError> {
        if nodes.is_empty() {
            return Err(AncestryError::InvalidChain(
                "Ancestor chain must contain at least the target".to_string(),
            ));
        }
        Ok(Self { nodes })
    }

    /// The object the chain ends at
    pub fn target(&self) -> &ContentId {
        // non-empty by construction
        &self.nodes[self.nodes.len() - 1].id
    }

    /// The topmost object of the chain
    pub fn root(&self) -> &ContentId {
        &self.nodes[0].id
    }

    /// Nodes ordered root first
    pub fn nodes(&self) -> &[AncestorNode] {
        &self.nodes
    }

    /// Number of levels, including the target
    pub fn depth(&self) -> usize {
        self.nodes.len()
    }

    /// Effective roles for `principal`: its assignments at the level nearest the target
    ///
    /// Farther assignments for the same principal are shadowed, never merged.
    /// Several roles on that one level are all kept. Returns `None` when the
    /// principal has no assignment anywhere in the chain.
    pub fn nearest_roles(&self, principal: &Principal) -> Option<BTreeSet<Role>> {
        self.nodes
            .iter()
            .rev()
            .map(|node| node.roles_for(principal))
            .find(|roles| !roles.is_empty())
    }

    /// Check that the chain ends at `target`
    pub fn ensure_target(&self, target: &ContentId) -> Result<(), AncestryError> {
        if self.target() == target {
            Ok(())
        } else {
            Err(AncestryError::InvalidChain(format!(
                "Chain ends at {} but {} was requested",
                self.target(),
                target
            )))
        }
    }
}

impl TryFrom<Vec<AncestorNode>> for AncestorChain {
    type Error = AncestryError;

    fn try_from(nodes: Vec<AncestorNode>) -> Result<Self, Self::Error> {
        Self::new(nodes)
    }
}

impl From<AncestorChain> for Vec<AncestorNode> {
    fn from(chain: AncestorChain) -> Self {
        chain.nodes
    }
}

/// Supplies ancestor chains for content objects
///
/// Implementations own any I/O, caching and retries. Failures are returned
/// as-is and are fatal to the decision that requested the chain.
#[async_trait]
pub trait AncestryProvider: Send + Sync {
    /// Chain from the root to `target`, inclusive
    async fn ancestor_chain(&self, target: &ContentId) -> Result<AncestorChain, AncestryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> AncestorChain {
        AncestorChain::new(vec![
            AncestorNode::new("unit").with_assignment("everyone", Role::CanViewOriginals),
            AncestorNode::new("collection")
                .with_assignment("everyone", Role::None)
                .with_assignment("staff", Role::CanManage),
            AncestorNode::new("file"),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_chain_rejected() {
        assert!(matches!(
            AncestorChain::new(vec![]),
            Err(AncestryError::InvalidChain(_))
        ));
    }

    #[test]
    fn test_endpoints() {
        let chain = chain();
        assert_eq!(chain.root().as_str(), "unit");
        assert_eq!(chain.target().as_str(), "file");
        assert_eq!(chain.depth(), 3);
    }

    #[test]
    fn test_nearest_assignment_shadows_farther() {
        let chain = chain();
        assert_eq!(
            chain.nearest_roles(&Principal::everyone()),
            Some(BTreeSet::from([Role::None]))
        );
        assert_eq!(
            chain.nearest_roles(&Principal::new("staff")),
            Some(BTreeSet::from([Role::CanManage]))
        );
        assert_eq!(chain.nearest_roles(&Principal::new("nobody")), None);
    }

    #[test]
    fn test_same_node_roles_are_all_kept() {
        let chain = AncestorChain::new(vec![
            AncestorNode::new("unit").with_assignment("grp", Role::CanManage),
            AncestorNode::new("c")
                .with_assignment("grp", Role::CanIngest)
                .with_assignment("grp", Role::CanDescribe)
                .with_assignment("grp", Role::CanIngest),
        ])
        .unwrap();

        assert_eq!(
            chain.nearest_roles(&Principal::new("grp")),
            Some(BTreeSet::from([Role::CanIngest, Role::CanDescribe]))
        );
    }

    #[test]
    fn test_ensure_target() {
        let chain = chain();
        assert!(chain.ensure_target(&ContentId::new("file")).is_ok());
        assert!(chain.ensure_target(&ContentId::new("collection")).is_err());
    }

    #[test]
    fn test_deserialize_rejects_empty_chain() {
        let result: Result<AncestorChain, _> = serde_json::from_str("[]");
        assert!(result.is_err());

        let chain: AncestorChain = serde_json::from_str(
            r#"[{"id":"root","assignments":[{"principal":"everyone","role":"canViewMetadata"}]},{"id":"leaf"}]"#,
        )
        .unwrap();
        assert_eq!(
            chain.nearest_roles(&Principal::everyone()),
            Some(BTreeSet::from([Role::CanViewMetadata]))
        );
    }
}
