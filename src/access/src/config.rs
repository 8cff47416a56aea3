//! Access control configuration loading and validation

use crate::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Complete access control configuration
///
/// ```toml
/// [global]
/// principals = ["repo:admins"]
///
/// [filter]
/// patron_access_enabled = true
/// read_group_field = "readGroup"
/// admin_group_field = "adminGroup"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessConfig {
    #[serde(default)]
    pub global: GlobalSection,

    #[serde(default)]
    pub filter: FilterSection,
}

/// Superuser principals that bypass tree-based evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GlobalSection {
    #[serde(default)]
    pub principals: Vec<String>,
}

/// Search filter settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterSection {
    #[serde(default = "default_true")]
    pub patron_access_enabled: bool,
    #[serde(default = "default_read_group_field")]
    pub read_group_field: String,
    #[serde(default = "default_admin_group_field")]
    pub admin_group_field: String,
}

impl Default for FilterSection {
    fn default() -> Self {
        Self {
            patron_access_enabled: default_true(),
            read_group_field: default_read_group_field(),
            admin_group_field: default_admin_group_field(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_read_group_field() -> String {
    "readGroup".to_string()
}

fn default_admin_group_field() -> String {
    "adminGroup".to_string()
}

impl AccessConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!(
            "Loaded access configuration from {} ({} global principals)",
            path.display(),
            config.global.principals.len()
        );
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| AccessError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject blank principal and field names
    pub fn validate(&self) -> Result<()> {
        if let Some(idx) = self.global.principals.iter().position(|p| p.trim().is_empty()) {
            return Err(AccessError::Config(format!(
                "global.principals[{}] must not be blank",
                idx
            )));
        }

        for (name, value) in [
            ("filter.read_group_field", &self.filter.read_group_field),
            ("filter.admin_group_field", &self.filter.admin_group_field),
        ] {
            if value.trim().is_empty() {
                return Err(AccessError::Config(format!("{} must not be blank", name)));
            }
        }

        Ok(())
    }
}
