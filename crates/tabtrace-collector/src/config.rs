use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_STORAGE_KEY: &str = "activity_events_v1";
pub const DEFAULT_TOP_KEYWORDS: usize = 10;

/// Static collector settings, distinct from user preferences: these are
/// deployment knobs, not per-user consent switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Logical key the event log document lives under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Keyword cutoff applied per page sample and per domain aggregate
    #[serde(default = "default_top_keywords")]
    pub top_keywords: usize,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_top_keywords() -> usize {
    DEFAULT_TOP_KEYWORDS
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            top_keywords: default_top_keywords(),
        }
    }
}

impl CollectorConfig {
    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: CollectorConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::default();
        assert_eq!(config.storage_key, "activity_events_v1");
        assert_eq!(config.top_keywords, 10);
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = CollectorConfig::load_from(&temp_dir.path().join("missing.toml"))?;
        assert_eq!(config.storage_key, "activity_events_v1");
        Ok(())
    }

    #[test]
    fn test_save_and_load_round_trip() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("collector.toml");

        let config = CollectorConfig {
            storage_key: "activity_events_v2".to_string(),
            top_keywords: 5,
        };
        config.save_to(&path)?;

        let loaded = CollectorConfig::load_from(&path)?;
        assert_eq!(loaded.storage_key, "activity_events_v2");
        assert_eq!(loaded.top_keywords, 5);
        Ok(())
    }
}
