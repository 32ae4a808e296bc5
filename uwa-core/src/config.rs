//! Configuration for UWA synthesis and the record store.

use serde::{Deserialize, Serialize};

use crate::format::{ChunkFormatter, DEFAULT_CHUNK_WIDTH, DEFAULT_DELIMITER};
use crate::matrix::{InclusionMatrix, OrganizationOverrides, ProfileSet};
use crate::synthesis::{UwaSynthesizer, DEFAULT_PREFIX};
use crate::types::UnknownFieldPolicy;

/// Error types for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// YAML could not be parsed or produced
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Parsed values violate a constraint
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a UWA deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UwaConfig {
    /// Store instance id, attached to log events
    pub store_id: String,
    /// Namespace tag leading every token
    pub namespace_prefix: String,
    /// Characters per display chunk
    pub chunk_width: usize,
    /// Delimiter between display chunks
    pub delimiter: char,
    /// Handling of field names outside the vocabulary
    pub unknown_fields: UnknownFieldPolicy,
    /// Reject records whose token another record already holds
    pub reject_duplicate_tokens: bool,
    /// Organization overrides applied on top of the default profiles
    pub overrides: OrganizationOverrides,
}

impl Default for UwaConfig {
    fn default() -> Self {
        Self {
            store_id: uuid::Uuid::new_v4().to_string(),
            namespace_prefix: DEFAULT_PREFIX.to_string(),
            chunk_width: DEFAULT_CHUNK_WIDTH,
            delimiter: DEFAULT_DELIMITER,
            unknown_fields: UnknownFieldPolicy::Reject,
            reject_duplicate_tokens: true,
            overrides: OrganizationOverrides::new(),
        }
    }
}

impl UwaConfig {
    /// Create a new config with a store ID.
    pub fn new(store_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            ..Default::default()
        }
    }

    /// Load config from YAML and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check value constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "namespace_prefix must not be empty".to_string(),
            ));
        }
        if self.chunk_width == 0 {
            return Err(ConfigError::Invalid(
                "chunk_width must be at least 1".to_string(),
            ));
        }
        if self.delimiter.is_alphanumeric() {
            return Err(ConfigError::Invalid(format!(
                "delimiter '{}' would be indistinguishable from token characters",
                self.delimiter
            )));
        }
        if self.namespace_prefix.contains(self.delimiter) {
            return Err(ConfigError::Invalid(format!(
                "namespace_prefix '{}' contains the delimiter '{}'",
                self.namespace_prefix, self.delimiter
            )));
        }
        Ok(())
    }

    /// Synthesizer using the configured prefix.
    pub fn synthesizer(&self) -> UwaSynthesizer {
        UwaSynthesizer::with_prefix(self.namespace_prefix.clone())
    }

    /// Formatter using the configured width and delimiter.
    pub fn formatter(&self) -> ChunkFormatter {
        ChunkFormatter::new(self.chunk_width, self.delimiter)
    }

    /// Default profiles with the configured overrides applied.
    pub fn profiles(&self, matrix: &InclusionMatrix) -> Result<ProfileSet, ConfigError> {
        matrix
            .resolve_all(&self.overrides)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
