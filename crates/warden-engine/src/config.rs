//! Engine configuration.
//!
//! Loaded from environment variables with defaults suitable for embedding.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use warden_core::GroupId;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Group whose members are authorized for resource-scoped checks by
    /// their membership alone, without per-resource references.
    pub system_group: Option<GroupId>,

    /// Emit denied checks at `warn` level instead of `debug`.
    pub log_denials: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            system_group: None,
            log_denials: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `WARDEN_SYSTEM_GROUP`: system group id (default: none)
    /// - `WARDEN_LOG_DENIALS`: log denials at warn level (default: true)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            system_group: std::env::var("WARDEN_SYSTEM_GROUP")
                .ok()
                .filter(|s| !s.is_empty())
                .map(GroupId::from),
            log_denials: std::env::var("WARDEN_LOG_DENIALS")
                .map(|s| s != "false" && s != "0")
                .unwrap_or(default.log_denials),
        }
    }

    /// Set the system group.
    pub fn with_system_group(mut self, group: impl Into<GroupId>) -> Self {
        self.system_group = Some(group.into());
        self
    }

    /// Check if `group` is the configured system group.
    pub fn is_system_group(&self, group: &GroupId) -> bool {
        self.system_group.as_ref() == Some(group)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(group) = &self.system_group {
            if group.as_str().trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "WARDEN_SYSTEM_GROUP".to_string(),
                    message: "system group id must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.system_group.is_none());
        assert!(config.log_denials);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_system_group() {
        let config = EngineConfig::default().with_system_group("system");
        assert!(config.is_system_group(&GroupId::from("system")));
        assert!(!config.is_system_group(&GroupId::from("staff")));
    }

    #[test]
    fn test_blank_system_group_rejected() {
        let config = EngineConfig::default().with_system_group("  ");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("WARDEN_SYSTEM_GROUP"));
    }

    #[test]
    fn test_config_serialization() {
        let config = EngineConfig::default().with_system_group("system");
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
