//! Game configuration loaded from JSON.
//!
//! Every field has a default, so an empty object `{}` is a valid config and
//! a missing file means "all defaults".

use std::path::{Path, PathBuf};

use petcare_logic::constants::{DECAY_INTERVAL_MS, RECOVERY_INTERVAL_MS, RECOVERY_STEP};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A field holds a value the scheduler cannot run with.
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Milliseconds between decay ticks.
    pub decay_interval_ms: u64,
    /// Milliseconds between sleep-recovery sub-ticks.
    pub recovery_interval_ms: u64,
    /// Sleep restored per recovery sub-tick.
    pub recovery_step: u32,
    /// Directory holding the save slots and the limits file.
    pub save_dir: PathBuf,
    /// File name of the playtime limits, relative to `save_dir`.
    pub limits_file: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            decay_interval_ms: DECAY_INTERVAL_MS,
            recovery_interval_ms: RECOVERY_INTERVAL_MS,
            recovery_step: RECOVERY_STEP as u32,
            save_dir: PathBuf::from("saves"),
            limits_file: "limits.json".to_string(),
        }
    }
}

impl GameConfig {
    /// Load from `path`, or return the defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_json(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.decay_interval_ms == 0 {
            return Err(ConfigError::Invalid("decay_interval_ms must be > 0".into()));
        }
        if self.recovery_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "recovery_interval_ms must be > 0".into(),
            ));
        }
        if self.recovery_step == 0 {
            return Err(ConfigError::Invalid("recovery_step must be > 0".into()));
        }
        if self.limits_file.trim().is_empty() {
            return Err(ConfigError::Invalid("limits_file must not be empty".into()));
        }
        Ok(())
    }

    pub fn limits_path(&self) -> PathBuf {
        self.save_dir.join(&self.limits_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_defaults() {
        assert_eq!(GameConfig::from_json("{}").unwrap(), GameConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let c = GameConfig::from_json(r#"{"decay_interval_ms": 500, "save_dir": "/tmp/pets"}"#)
            .unwrap();
        assert_eq!(c.decay_interval_ms, 500);
        assert_eq!(c.recovery_interval_ms, RECOVERY_INTERVAL_MS);
        assert_eq!(c.limits_path(), PathBuf::from("/tmp/pets/limits.json"));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = GameConfig::from_json(r#"{"recovery_interval_ms": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            GameConfig::from_json("{ nope"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = GameConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(c, GameConfig::default());
    }
}
