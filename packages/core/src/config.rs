//! Configuration for an editing session and its persistence
use crate::services::history::DEFAULT_HISTORY_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upper bound for history capacity
const MAX_HISTORY_CAPACITY: usize = 10_000;

/// Upper bound for save retries
const MAX_SAVE_RETRIES: usize = 10;

pub const ENV_HISTORY_CAPACITY: &str = "HEARTBEAT_HISTORY_CAPACITY";
pub const ENV_SAVE_RETRIES: &str = "HEARTBEAT_SAVE_RETRIES";
pub const ENV_DATA_DIR: &str = "HEARTBEAT_DATA_DIR";

/// Retry policy for saves: `max_retries` extra attempts after the first,
/// sleeping `base_delay_ms * 2^attempt` between them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 10,
        }
    }
}

impl RetryConfig {
    /// Backoff before retry number `attempt` (0-based): 10ms, 20ms, 40ms, ...
    pub fn backoff_ms(&self, attempt: usize) -> u64 {
        let shift = attempt.min(16) as u32;
        self.base_delay_ms.saturating_mul(1u64 << shift)
    }
}

/// Editor session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo entries kept
    pub history_capacity: usize,

    /// Retry policy of the persistence layer
    pub save_retry: RetryConfig,

    /// Directory of the flat-file blob store
    pub data_dir: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            save_retry: RetryConfig::default(),
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl EditorConfig {
    /// Defaults overlaid with `HEARTBEAT_*` environment variables
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with values from `lookup` (environment-style names)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_HISTORY_CAPACITY) {
            config.history_capacity = value
                .trim()
                .parse()
                .map_err(|_| format!("{ENV_HISTORY_CAPACITY} must be a number, got '{value}'"))?;
        }

        if let Some(value) = lookup(ENV_SAVE_RETRIES) {
            config.save_retry.max_retries = value
                .trim()
                .parse()
                .map_err(|_| format!("{ENV_SAVE_RETRIES} must be a number, got '{value}'"))?;
        }

        if let Some(value) = lookup(ENV_DATA_DIR) {
            if !value.trim().is_empty() {
                config.data_dir = PathBuf::from(value.trim());
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.history_capacity == 0 {
            return Err("history_capacity must be greater than 0".to_string());
        }

        if self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(format!(
                "history_capacity cannot exceed {}",
                MAX_HISTORY_CAPACITY
            ));
        }

        if self.save_retry.max_retries > MAX_SAVE_RETRIES {
            return Err(format!(
                "save_retry.max_retries cannot exceed {}",
                MAX_SAVE_RETRIES
            ));
        }

        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir cannot be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.history_capacity, 100);
        assert_eq!(config.save_retry.max_retries, 3);
        assert_eq!(config.save_retry.base_delay_ms, 10);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EditorConfig::default();

        config.history_capacity = 0;
        assert!(config.validate().is_err());

        config.history_capacity = 50_000;
        assert!(config.validate().is_err());

        config.history_capacity = 10;
        config.save_retry.max_retries = 11;
        assert!(config.validate().is_err());

        config.save_retry.max_retries = 0;
        config.data_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overlay() {
        let config = EditorConfig::from_lookup(lookup_from(&[
            (ENV_HISTORY_CAPACITY, "25"),
            (ENV_SAVE_RETRIES, " 5 "),
            (ENV_DATA_DIR, "/var/lib/heartbeat"),
        ]))
        .unwrap();
        assert_eq!(config.history_capacity, 25);
        assert_eq!(config.save_retry.max_retries, 5);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/heartbeat"));

        let unset = EditorConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(unset, EditorConfig::default());
    }

    #[test]
    fn test_env_overlay_rejects_garbage() {
        let err = EditorConfig::from_lookup(lookup_from(&[(ENV_HISTORY_CAPACITY, "lots")]))
            .unwrap_err();
        assert!(err.contains(ENV_HISTORY_CAPACITY));

        assert!(EditorConfig::from_lookup(lookup_from(&[(ENV_HISTORY_CAPACITY, "0")])).is_err());
    }

    #[test]
    fn test_backoff_doubles() {
        let retry = RetryConfig::default();
        assert_eq!(retry.backoff_ms(0), 10);
        assert_eq!(retry.backoff_ms(1), 20);
        assert_eq!(retry.backoff_ms(2), 40);
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{"history_capacity": 7}"#).unwrap();
        assert_eq!(config.history_capacity, 7);
        assert_eq!(config.save_retry, RetryConfig::default());
    }
}
