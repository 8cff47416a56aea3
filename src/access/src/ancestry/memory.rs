//! In-memory content tree used by tests, demos and embedded deployments

use super::{AncestorChain, AncestorNode, AncestryProvider};
use crate::catalog::Role;
use crate::error::AncestryError;
use crate::types::{ContentId, Principal, RoleAssignment};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredNode {
    parent: Option<ContentId>,
    assignments: Vec<RoleAssignment>,
}

/// Ancestry provider backed by a concurrent map of parent links
///
/// Removing a node does not remove its descendants; they become orphaned and
/// report [`AncestryError::Orphaned`] until re-parented.
#[derive(Clone, Default)]
pub struct InMemoryAncestryProvider {
    nodes: Arc<DashMap<ContentId, StoredNode>>,
}

impl InMemoryAncestryProvider {
    /// Empty content tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node without a parent
    pub fn add_root(&self, id: impl Into<ContentId>) {
        self.nodes.insert(
            id.into(),
            StoredNode {
                parent: None,
                assignments: Vec::new(),
            },
        );
    }

    /// Add (or re-parent) `id` under `parent`
    pub fn add_child(
        &self,
        parent: impl Into<ContentId>,
        id: impl Into<ContentId>,
    ) -> Result<(), AncestryError> {
        let parent = parent.into();
        if !self.nodes.contains_key(&parent) {
            return Err(AncestryError::NotFound(parent));
        }

        let id = id.into();
        self.nodes
            .entry(id)
            .and_modify(|node| node.parent = Some(parent.clone()))
            .or_insert_with(|| StoredNode {
                parent: Some(parent.clone()),
                assignments: Vec::new(),
            });
        Ok(())
    }

    /// Assign `role` to `principal` on `id`
    pub fn assign(
        &self,
        id: &ContentId,
        principal: impl Into<Principal>,
        role: Role,
    ) -> Result<(), AncestryError> {
        let mut node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| AncestryError::NotFound(id.clone()))?;

        let assignment = RoleAssignment::new(principal, role);
        if !node.assignments.contains(&assignment) {
            node.assignments.push(assignment);
        }
        Ok(())
    }

    /// Remove every assignment `principal` holds directly on `id`
    pub fn revoke(&self, id: &ContentId, principal: &Principal) -> Result<usize, AncestryError> {
        let mut node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| AncestryError::NotFound(id.clone()))?;

        let before = node.assignments.len();
        node.assignments.retain(|a| &a.principal != principal);
        Ok(before - node.assignments.len())
    }

    /// Remove a node, leaving its children orphaned
    pub fn remove(&self, id: &ContentId) -> bool {
        self.nodes.remove(id).is_some()
    }

    /// Number of stored nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn walk(&self, target: &ContentId) -> Result<AncestorChain, AncestryError> {
        let mut nodes = Vec::new();
        let mut visited = HashSet::new();
        let mut current = target.clone();

        loop {
            if !visited.insert(current.clone()) {
                return Err(AncestryError::Cycle(target.clone()));
            }

            let stored = match self.nodes.get(&current) {
                Some(stored) => stored.value().clone(),
                None if nodes.is_empty() => return Err(AncestryError::NotFound(current)),
                None => {
                    return Err(AncestryError::Orphaned {
                        id: target.clone(),
                        missing_parent: current,
                    })
                }
            };

            nodes.push(AncestorNode {
                id: current,
                assignments: stored.assignments,
            });

            match stored.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }

        nodes.reverse();
        AncestorChain::new(nodes)
    }
}

#[async_trait]
impl AncestryProvider for InMemoryAncestryProvider {
    async fn ancestor_chain(&self, target: &ContentId) -> Result<AncestorChain, AncestryError> {
        let chain = self.walk(target)?;
        debug!("Resolved {} ancestor levels for {}", chain.depth(), target);
        Ok(chain)
    }
}
