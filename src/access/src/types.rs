//! Core access control types

use crate::catalog::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Repository object identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Create a new content identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ContentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// User or group identifier used in access checks
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Any caller, authenticated or not
    pub const EVERYONE: &'static str = "everyone";

    /// Any caller that has signed in
    pub const AUTHENTICATED: &'static str = "authenticated";

    /// Create a new principal
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The `everyone` public group
    pub fn everyone() -> Self {
        Self::new(Self::EVERYONE)
    }

    /// The `authenticated` public group
    pub fn authenticated() -> Self {
        Self::new(Self::AUTHENTICATED)
    }

    /// Principal name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the built-in public groups
    pub fn is_public_group(&self) -> bool {
        self.0 == Self::EVERYONE || self.0 == Self::AUTHENTICATED
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Principal {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// The principals a caller acts as
///
/// Ordered so that iteration, filters and diagnostics are deterministic.
/// Public groups are never added implicitly; callers include
/// [`Principal::EVERYONE`] and [`Principal::AUTHENTICATED`] themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalSet(BTreeSet<Principal>);

impl PrincipalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a principal, returning the set for chaining
    pub fn with(mut self, principal: impl Into<Principal>) -> Self {
        self.0.insert(principal.into());
        self
    }

    /// Add a principal, returning whether it was new
    pub fn insert(&mut self, principal: impl Into<Principal>) -> bool {
        self.0.insert(principal.into())
    }

    /// Whether `principal` is in the set
    pub fn contains(&self, principal: &Principal) -> bool {
        self.0.contains(principal)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct principals
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Principals in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &Principal> {
        self.0.iter()
    }

    /// Non-empty intersection test
    pub fn intersects(&self, other: &BTreeSet<Principal>) -> bool {
        let (small, large) = if self.0.len() <= other.len() {
            (&self.0, other)
        } else {
            (other, &self.0)
        };
        small.iter().any(|p| large.contains(p))
    }
}

impl<P: Into<Principal>> FromIterator<P> for PrincipalSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a PrincipalSet {
    type Item = &'a Principal;
    type IntoIter = std::collections::btree_set::Iter<'a, Principal>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PrincipalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Principal::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// A role granted to a principal on one content object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub principal: Principal,
    pub role: Role,
}

impl RoleAssignment {
    /// Assign `role` to `principal`
    pub fn new(principal: impl Into<Principal>, role: Role) -> Self {
        Self {
            principal: principal.into(),
            role,
        }
    }
}
