//! Search-index access filters
//!
//! Scopes bulk queries by the caller's principals instead of evaluating each
//! hit. The index is expected to store, per object, the groups that can read
//! it (`readGroup`) and the groups with staff access (`adminGroup`), computed
//! with the same nearest-wins rule at write time.

use crate::config::FilterSection;
use crate::error::{AccessError, Result};
use crate::types::PrincipalSet;
use std::fmt;

/// Characters with meaning in the index query syntax
const QUERY_SPECIAL_CHARS: &[char] = &[
    '\\', '+', '-', '!', '(', ')', ':', '^', '[', ']', '"', '{', '}', '~', '*', '?', '|', '&',
    ';', '/',
];

/// One `field:(v1 OR v2)` disjunction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldClause {
    pub field: String,
    pub values: Vec<String>,
}

impl fmt::Display for FieldClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:({})", self.field, self.values.join(" OR "))
    }
}

/// Filter fragment to attach to a search query
///
/// Clauses are OR-ed together. No clauses means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpression {
    clauses: Vec<FieldClause>,
}

impl FilterExpression {
    /// Filter that matches everything
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Whether the filter places no restriction on results
    pub fn is_unrestricted(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[FieldClause] {
        &self.clauses
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, clause) in self.clauses.iter().enumerate() {
            if idx > 0 {
                f.write_str(" OR ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

/// Escape a principal for use as a query term
pub fn escape_query_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if QUERY_SPECIAL_CHARS.contains(&c) || c.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds [`FilterExpression`]s from principal sets
#[derive(Debug, Clone)]
pub struct AccessFilterBuilder {
    read_group_field: String,
    admin_group_field: String,
}

impl Default for AccessFilterBuilder {
    fn default() -> Self {
        Self::from_config(&FilterSection::default())
    }
}

impl AccessFilterBuilder {
    /// Builder over custom index field names
    pub fn new(read_group_field: impl Into<String>, admin_group_field: impl Into<String>) -> Self {
        Self {
            read_group_field: read_group_field.into(),
            admin_group_field: admin_group_field.into(),
        }
    }

    pub fn from_config(section: &FilterSection) -> Self {
        Self::new(&section.read_group_field, &section.admin_group_field)
    }

    /// Filter restricting results to what `principals` may see
    ///
    /// Global principals get an unrestricted filter. Otherwise objects match
    /// through the admin group, and also through the read group when patron
    /// access is enabled. An empty principal set, or one containing a blank
    /// principal, is rejected.
    pub fn build_filter(
        &self,
        principals: &PrincipalSet,
        patron_access_enabled: bool,
        is_global_principal: bool,
    ) -> Result<FilterExpression> {
        if principals.is_empty() {
            return Err(AccessError::InvalidInput(
                "Cannot build an access filter for an empty principal set".to_string(),
            ));
        }

        if principals.iter().any(|p| p.as_str().trim().is_empty()) {
            return Err(AccessError::InvalidInput(format!(
                "Cannot build an access filter with a blank principal: {}",
                principals
            )));
        }

        if is_global_principal {
            return Ok(FilterExpression::unrestricted());
        }

        let values: Vec<String> = principals
            .iter()
            .map(|p| escape_query_value(p.as_str()))
            .collect();

        let mut clauses = Vec::with_capacity(2);
        if patron_access_enabled {
            clauses.push(FieldClause {
                field: self.read_group_field.clone(),
                values: values.clone(),
            });
        }
        clauses.push(FieldClause {
            field: self.admin_group_field.clone(),
            values,
        });

        Ok(FilterExpression { clauses })
    }
}
