//! Engine configuration.
//!
//! Loaded from `engine_config.json` (builtin or `ENGINE_CONFIG_PATH`), then
//! individual values may be overridden through environment variables.

use std::{
    env, fs, io,
    num::ParseIntError,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_ENGINE_CONFIG: &str = include_str!("data/engine_config.json");

pub const ENV_CONFIG_PATH: &str = "ENGINE_CONFIG_PATH";
pub const ENV_BACKGROUND_MIN: &str = "BACKGROUND_ENTITIES_MIN";
pub const ENV_BACKGROUND_MAX: &str = "BACKGROUND_ENTITIES_MAX";
pub const ENV_EXPERIMENT_TARGET_COUNT: &str = "EXPERIMENT_TARGET_COUNT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub casting: CastingConfig,
    pub experiment: ExperimentConfig,
}

/// Bounds on how many background entities a scenario is cast with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CastingConfig {
    pub background_min: usize,
    pub background_max: usize,
}

impl Default for CastingConfig {
    fn default() -> Self {
        Self {
            background_min: 2,
            background_max: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Scenarios per session. Falls back to the number of loaded templates.
    pub target_count: Option<usize>,
}

#[derive(Debug, Error)]
pub enum EngineConfigError {
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read engine config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid value `{value}` for {key}: {source}")]
    InvalidOverride {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("background entity range is empty: min {min} > max {max}")]
    BackgroundRange { min: usize, max: usize },
}

impl EngineConfig {
    pub fn builtin() -> Result<Self, EngineConfigError> {
        Self::from_json_str(BUILTIN_ENGINE_CONFIG)
    }

    pub fn from_json_str(json: &str) -> Result<Self, EngineConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, EngineConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| EngineConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), EngineConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = parse_override(&lookup, ENV_BACKGROUND_MIN)? {
            self.casting.background_min = value;
        }
        if let Some(value) = parse_override(&lookup, ENV_BACKGROUND_MAX)? {
            self.casting.background_max = value;
        }
        if let Some(value) = parse_override(&lookup, ENV_EXPERIMENT_TARGET_COUNT)? {
            self.experiment.target_count = Some(value);
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), EngineConfigError> {
        if self.casting.background_min > self.casting.background_max {
            return Err(EngineConfigError::BackgroundRange {
                min: self.casting.background_min,
                max: self.casting.background_max,
            });
        }
        Ok(())
    }
}

fn parse_override<F>(lookup: &F, key: &'static str) -> Result<Option<usize>, EngineConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<usize>()
        .map(Some)
        .map_err(|source| EngineConfigError::InvalidOverride {
            key,
            value: raw.clone(),
            source,
        })
}

#[derive(Debug, Clone)]
pub struct EngineConfigMetadata {
    path: Option<PathBuf>,
}

impl EngineConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Resolve the engine config for this process.
///
/// A broken `ENGINE_CONFIG_PATH` file is logged and replaced by the builtin
/// config; a malformed environment override is an error.
pub fn load_engine_config_from_env() -> Result<(EngineConfig, EngineConfigMetadata), EngineConfigError>
{
    let mut loaded = None;
    if let Some(path) = env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from) {
        match EngineConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "scenario_grid::config",
                    path = %path.display(),
                    "engine_config.loaded=file"
                );
                loaded = Some((config, EngineConfigMetadata::new(Some(path))));
            }
            Err(err) => {
                tracing::warn!(
                    target: "scenario_grid::config",
                    path = %path.display(),
                    error = %err,
                    "engine_config.load_failed"
                );
            }
        }
    }

    let (mut config, metadata) = match loaded {
        Some(found) => found,
        None => {
            tracing::info!(target: "scenario_grid::config", "engine_config.loaded=builtin");
            (EngineConfig::builtin()?, EngineConfigMetadata::new(None))
        }
    };

    config.apply_overrides(|key| env::var(key).ok())?;
    tracing::debug!(
        target: "scenario_grid::config",
        background_min = config.casting.background_min,
        background_max = config.casting.background_max,
        target_count = ?config.experiment.target_count,
        "engine_config.resolved"
    );
    Ok((config, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn builtin_config_parses() {
        let config = EngineConfig::builtin().unwrap();
        assert_eq!(config.casting, CastingConfig::default());
        assert_eq!(config.experiment.target_count, None);
    }

    #[test]
    fn partial_documents_use_defaults() {
        let config = EngineConfig::from_json_str(r#"{"experiment": {"target_count": 6}}"#).unwrap();
        assert_eq!(config.casting.background_max, 5);
        assert_eq!(config.experiment.target_count, Some(6));
    }

    #[test]
    fn environment_overrides_apply() {
        let mut config = EngineConfig::default();
        config
            .apply_overrides(lookup(&[
                (ENV_BACKGROUND_MIN, "1"),
                (ENV_BACKGROUND_MAX, " 8 "),
                (ENV_EXPERIMENT_TARGET_COUNT, "12"),
            ]))
            .unwrap();
        assert_eq!(config.casting.background_min, 1);
        assert_eq!(config.casting.background_max, 8);
        assert_eq!(config.experiment.target_count, Some(12));
    }

    #[test]
    fn blank_override_is_ignored() {
        let mut config = EngineConfig::default();
        config
            .apply_overrides(lookup(&[(ENV_BACKGROUND_MIN, "")]))
            .unwrap();
        assert_eq!(config.casting.background_min, 2);
    }

    #[test]
    fn bad_override_is_rejected() {
        let mut config = EngineConfig::default();
        let err = config
            .apply_overrides(lookup(&[(ENV_BACKGROUND_MAX, "lots")]))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineConfigError::InvalidOverride {
                key: ENV_BACKGROUND_MAX,
                ..
            }
        ));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut config = EngineConfig::default();
        let err = config
            .apply_overrides(lookup(&[(ENV_BACKGROUND_MIN, "9")]))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineConfigError::BackgroundRange { min: 9, max: 5 }
        ));
    }
}
