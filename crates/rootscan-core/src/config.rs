//! Scan configuration types.

use derive_builder::Builder;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Configuration shared by every walker of a scan.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Follow symbolic links.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Maximum depth to traverse below each root (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Entry names to skip, in glob syntax.
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Threads used to read directories within one root (0 or 1 = serial).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,
}

fn default_true() -> bool {
    true
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref patterns) = self.ignore_patterns {
            for pattern in patterns {
                Glob::new(pattern).map_err(|e| format!("Invalid ignore pattern '{pattern}': {e}"))?;
            }
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a config with default settings.
    pub fn new() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: true,
            max_depth: None,
            ignore_patterns: Vec::new(),
            threads: 0,
        }
    }

    /// Compile the ignore patterns into a matcher for entry names.
    pub fn ignore_set(&self) -> Result<GlobSet, ScanError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore_patterns {
            let glob = Glob::new(pattern).map_err(|e| ScanError::InvalidConfig {
                message: format!("invalid ignore pattern '{pattern}': {e}"),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| ScanError::InvalidConfig {
            message: e.to_string(),
        })
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}
