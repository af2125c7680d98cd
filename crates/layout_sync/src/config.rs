//! Session configuration
//!
//! `SyncConfig` holds everything a directory session needs besides its
//! collaborators: grid bounds, size floors, the save debounce and the policy
//! for geometry reported by the drag layer. It is plain serde data so hosts
//! can keep it in a JSON settings file.

use crate::error::ConfigError;
use grid_model::{GridBounds, SizeConstraints};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default quiet period before a layout save, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// What to do with drag/resize geometry that collides or leaves the grid
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Accept whatever the interactive layer reports
    #[default]
    Trust,
    /// Refuse edits that overlap a sibling or leave the bounds
    Reject,
}

/// Directory session configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    /// Grid dimensions
    pub bounds: GridBounds,
    /// Size floor and new-widget size
    pub constraints: SizeConstraints,
    /// Quiet period before a debounced save (in milliseconds)
    pub debounce_ms: u64,
    /// Handling of colliding drag/resize geometry
    pub overlap_policy: OverlapPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            bounds: GridBounds::default(),
            constraints: SizeConstraints::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            overlap_policy: OverlapPolicy::Trust,
        }
    }
}

impl SyncConfig {
    /// Create a new config with custom bounds
    pub fn with_bounds(mut self, bounds: GridBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Create a new config with a custom debounce period
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Create a new config with a custom overlap policy
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Check bounds and that new widgets respect the size floor
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds.validate()?;
        let c = &self.constraints;
        if c.default_w < c.min_w || c.default_h < c.min_h {
            return Err(ConfigError::InvalidConstraints(format!(
                "default size {}x{} is below minimum {}x{}",
                c.default_w, c.default_h, c.min_w, c.min_h
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it is missing or unusable
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match Self::from_json_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse layout config {}, using defaults: {}",
                    path.display(),
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = SyncConfig::default();
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.bounds.columns(), 16);
        assert_eq!(config.overlap_policy, OverlapPolicy::Trust);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builders() {
        let bounds = GridBounds::new(12, 8, 40).unwrap();
        let config = SyncConfig::default()
            .with_bounds(bounds)
            .with_debounce_ms(250)
            .with_overlap_policy(OverlapPolicy::Reject);

        assert_eq!(config.bounds, bounds);
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.overlap_policy, OverlapPolicy::Reject);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = SyncConfig::from_json_str(r#"{"overlapPolicy":"reject"}"#).unwrap();
        assert_eq!(config.overlap_policy, OverlapPolicy::Reject);
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.constraints, SizeConstraints::default());
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let err = SyncConfig::from_json_str(
            r#"{"bounds":{"columns":0,"rows":16,"rowHeightPx":30}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Grid(_)));
    }

    #[test]
    fn test_default_below_minimum_rejected() {
        let err =
            SyncConfig::from_json_str(r#"{"constraints":{"minW":6,"defaultW":4}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConstraints(_)));
    }

    #[test]
    fn test_load_save_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("layout.json");

        // Missing file yields defaults
        assert_eq!(SyncConfig::load(&path).unwrap(), SyncConfig::default());

        let config = SyncConfig::default().with_debounce_ms(900);
        config.save(&path).unwrap();
        assert_eq!(SyncConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_garbage_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("layout.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(SyncConfig::load(&path).unwrap(), SyncConfig::default());
    }
}
