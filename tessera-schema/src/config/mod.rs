//! Configuration file parsing for `tessera.toml`.
//!
//! ```toml
//! [compare]
//! include_triggers = false
//!
//! [merge]
//! on_duplicate = "replace"   # or "reject"
//!
//! [metadata]
//! table = "SQLMETA"
//! ```

use std::path::Path;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::ast::{CompareOptions, MergeOptions};
use crate::error::{SchemaError, SchemaResult};
use crate::meta::{MetadataConfig, MetadataReconciler};

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

/// Main configuration structure for `tessera.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TesseraConfig {
    /// Schema comparison settings.
    #[serde(default)]
    pub compare: CompareOptions,

    /// Schema merge settings.
    #[serde(default)]
    pub merge: MergeOptions,

    /// Metadata reconciliation settings.
    #[serde(default)]
    pub metadata: MetadataConfig,
}

impl TesseraConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> SchemaResult<Self> {
        let expanded = expand_env_vars(content);
        let config: Self =
            toml::from_str(&expanded).map_err(|e| SchemaError::TomlError { source: e })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> SchemaResult<()> {
        if self.metadata.table.trim().is_empty() {
            return Err(SchemaError::ConfigError {
                message: "metadata.table must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Build a metadata reconciler from the `[metadata]` section.
    pub fn reconciler(&self) -> MetadataReconciler {
        MetadataReconciler::new(self.metadata.clone())
    }
}

/// Expand environment variables in the format `${VAR_NAME}`.
///
/// Unset variables are left as written.
fn expand_env_vars(content: &str) -> String {
    ENV_VAR
        .replace_all(content, |caps: &regex_lite::Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
