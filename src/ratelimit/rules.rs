//! Named rate rules.
//!
//! Hosts usually keep their quotas in configuration rather than code. A rule
//! table maps a name such as `login` or `api` to a validated [`Rate`]:
//!
//! ```yaml
//! rates:
//!   login:
//!     operations: 5
//!     unit: minute
//!   form_submit:
//!     operations: 3
//!     interval_secs: 10
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use super::rate::Rate;
use crate::error::{QuotaError, Result};

/// A table of named rates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// Map of rule name to rate
    #[serde(default)]
    pub rates: BTreeMap<String, Rate>,
}

impl RateTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading rate rules");

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load a table from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| QuotaError::Config(format!("Failed to parse rate rules: {}", e)))
    }

    /// Add or replace a rule.
    pub fn insert(&mut self, name: impl Into<String>, rate: Rate) -> Option<Rate> {
        self.rates.insert(name.into(), rate)
    }

    /// Get the rate for a rule.
    pub fn get(&self, name: &str) -> Option<Rate> {
        self.rates.get(name).copied()
    }

    /// Get the rate for a rule, failing when it is not configured.
    pub fn require(&self, name: &str) -> Result<Rate> {
        self.get(name)
            .ok_or_else(|| QuotaError::Config(format!("No rate rule named '{}'", name)))
    }

    /// Rule names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
