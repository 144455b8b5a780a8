//! Configuration loading
//!
//! TOML file with defaults for every missing field, then environment
//! variable overrides on top. The reference dataset is a separate JSON
//! payload resolved here: unreadable or malformed input falls back to
//! the built-in table with a warning, while a table that parses but is
//! empty is a fatal configuration error.

use crate::classifier::{EmotionClassifier, ReferencePoint, ReferenceTable};
use crate::history::DEFAULT_MAX_HISTORY;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Fixed tick interval of the simulation clock, in milliseconds. A design
/// constant, not derived from data volume.
pub const DEFAULT_TICK_MS: u64 = 1000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThymosConfig {
    pub clock: ClockSettings,
    pub history: HistorySettings,
    /// Optional path to a JSON array of reference points. Absent: the
    /// built-in table is used.
    pub reference_table: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    pub interval_ms: u64,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_TICK_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub max_len: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_HISTORY,
        }
    }
}

impl ThymosConfig {
    /// Load config from a TOML file, falling back to defaults for missing
    /// fields. Env var overrides are applied after loading.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: ThymosConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if missing or invalid, use defaults with env
    /// overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("THYMOS_TICK_MS") {
            if let Ok(n) = v.parse() {
                self.clock.interval_ms = n;
            }
        }
        if let Ok(v) = std::env::var("THYMOS_MAX_HISTORY") {
            if let Ok(n) = v.parse() {
                self.history.max_len = n;
            }
        }
        if let Ok(v) = std::env::var("THYMOS_REFERENCE_TABLE") {
            self.reference_table = Some(PathBuf::from(v));
        }
    }

    /// Resolve the reference table: configured JSON file if it loads, the
    /// built-in fallback otherwise. An empty parsed table is fatal.
    pub fn reference_table(&self) -> Result<ReferenceTable> {
        let Some(path) = &self.reference_table else {
            return Ok(ReferenceTable::builtin());
        };

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(
                    "Cannot read reference table {} ({}), using built-in set",
                    path.display(),
                    e
                );
                return Ok(ReferenceTable::builtin());
            }
        };

        let points: Vec<ReferencePoint> = match serde_json::from_str(&content) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(
                    "Malformed reference table {} ({}), using built-in set",
                    path.display(),
                    e
                );
                return Ok(ReferenceTable::builtin());
            }
        };

        let table = ReferenceTable::new(points)
            .with_context(|| format!("Reference table {} is unusable", path.display()))?;
        tracing::info!(
            "Loaded reference table from {} ({} entries)",
            path.display(),
            table.len()
        );
        Ok(table)
    }

    /// Convenience: resolved table wrapped in a classifier.
    pub fn classifier(&self) -> Result<EmotionClassifier> {
        Ok(EmotionClassifier::new(self.reference_table()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ThymosConfig::default();
        assert_eq!(cfg.clock.interval_ms, 1000);
        assert_eq!(cfg.history.max_len, 100);
        assert!(cfg.reference_table.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: ThymosConfig = toml::from_str(
            r#"
            [history]
            max_len = 200
            "#,
        )
        .unwrap();
        assert_eq!(cfg.history.max_len, 200);
        assert_eq!(cfg.clock.interval_ms, 1000);
    }

    #[test]
    fn test_missing_table_path_uses_builtin() {
        let cfg = ThymosConfig {
            reference_table: Some(PathBuf::from("/nonexistent/table.json")),
            ..Default::default()
        };
        let table = cfg.reference_table().unwrap();
        assert_eq!(table.len(), ReferenceTable::builtin().len());
    }

    #[test]
    fn test_empty_table_is_fatal() {
        let dir = std::env::temp_dir().join("thymos_cfg_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty_table.json");
        std::fs::write(&path, "[]").unwrap();

        let cfg = ThymosConfig {
            reference_table: Some(path),
            ..Default::default()
        };
        assert!(cfg.reference_table().is_err());
    }

    #[test]
    fn test_malformed_table_falls_back() {
        let dir = std::env::temp_dir().join("thymos_cfg_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken_table.json");
        std::fs::write(&path, "{ not json").unwrap();

        let cfg = ThymosConfig {
            reference_table: Some(path),
            ..Default::default()
        };
        let table = cfg.reference_table().unwrap();
        assert_eq!(table.len(), ReferenceTable::builtin().len());
    }

    #[test]
    fn test_valid_table_file_loads() {
        let dir = std::env::temp_dir().join("thymos_cfg_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("good_table.json");
        std::fs::write(
            &path,
            r#"[{"emotion": "joy", "valence": 0.8, "dominance": 0.5, "arousal": 0.7}]"#,
        )
        .unwrap();

        let cfg = ThymosConfig {
            reference_table: Some(path),
            ..Default::default()
        };
        let table = cfg.reference_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.points()[0].emotion, "joy");
    }
}
