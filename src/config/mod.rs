use std::{fs, path::Path};

use serde::Deserialize;

use crate::core::error::SniffError;
use crate::core::history::DEFAULT_CAPACITY;
use crate::pipeline::escalator::{RecordPolicy, RecordRule};
use crate::pipeline::scorer::ScoringOptions;

pub const DEFAULT_CONFIG_PATH: &str = "config/linksniff.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct ScoringConfig {
    #[serde(default)]
    pub extended_combos: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct RecordConfig {
    #[serde(default)]
    pub policy: RecordPolicy,
    #[serde(default)]
    pub min_risk: u8,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HistoryConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_view_limit")]
    pub view_limit: usize,
    #[serde(default)]
    pub retention_days: u32,
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            view_limit: default_view_limit(),
            retention_days: 0,
            db_path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub record: RecordConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl AppConfig {
    pub fn scoring_options(&self) -> ScoringOptions {
        ScoringOptions {
            extended_combos: self.scoring.extended_combos,
        }
    }

    pub fn record_rule(&self) -> RecordRule {
        RecordRule {
            policy: self.record.policy,
            min_risk: self.record.min_risk,
        }
    }

    pub fn validate(&self) -> Result<(), SniffError> {
        if self.history.capacity == 0 {
            return Err(SniffError::Config("history.capacity must be > 0".into()));
        }
        if self.history.view_limit == 0 {
            return Err(SniffError::Config("history.view_limit must be > 0".into()));
        }
        if self.record.min_risk > 100 {
            return Err(SniffError::Config(format!(
                "record.min_risk must be <= 100 (got {})",
                self.record.min_risk
            )));
        }
        Ok(())
    }
}

/// Missing default file falls back to built-in defaults; a missing explicit path is an error.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, SniffError> {
    let explicit = path.is_some();
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));

    if !path.exists() {
        if explicit {
            return Err(SniffError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| SniffError::Config(e.to_string()))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, SniffError> {
    let cfg: AppConfig =
        toml::from_str(content).map_err(|e| SniffError::Config(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_view_limit() -> usize {
    100
}

fn default_db_path() -> String {
    "data/linksniff.db".to_string()
}
