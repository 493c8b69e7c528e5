// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scheduler options.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling what [`Scheduler`](crate::Scheduler) produces
///
/// Missing fields take their default when loaded from RON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleOptions {
    /// Re-level the topological order by critical-path distance
    pub leveled: bool,
    /// Check every scheduled node against its dependencies
    pub verify: bool,
    /// Fail when some graph nodes are unreachable from the inputs
    pub require_complete: bool,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            leveled: true,
            verify: cfg!(debug_assertions),
            require_complete: false,
        }
    }
}

impl ScheduleOptions {
    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(s)?)
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load options from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let options = Self::from_ron(&content)?;
        tracing::debug!(?options, "loaded schedule options from {}", path.display());
        Ok(options)
    }
}

/// Error when loading scheduler options
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RON parse failure
    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization failure
    #[error("RON serialization error: {0}")]
    Serialize(#[from] ron::Error),
}
