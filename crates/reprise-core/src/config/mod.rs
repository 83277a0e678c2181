//! Configuration system for reprise.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{RepriseError, RepriseResult};
use crate::scheduler::SchedulerConfig;

/// Due-card selection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DueConfig {
    /// Maximum number of due cards handed to one review session.
    /// `None` returns every due card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_limit: Option<usize>,
}

/// Main engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// SM-2 parameters.
    pub scheduler: SchedulerConfig,
    /// Due selection settings.
    pub due: DueConfig,
}

impl EngineConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> RepriseResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| RepriseError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| RepriseError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| RepriseError::Configuration(e.to_string()))?,
            _ => {
                return Err(RepriseError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their defaults; unparsable values are an error.
    pub fn from_env() -> RepriseResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from `REPRISE_*` variables resolved by `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RepriseResult<Self> {
        let mut config = Self::default();

        if let Some(value) = parse_var(&lookup, "REPRISE_INITIAL_EASE_FACTOR")? {
            config.scheduler.initial_ease_factor = value;
        }
        if let Some(value) = parse_var(&lookup, "REPRISE_MIN_EASE_FACTOR")? {
            config.scheduler.min_ease_factor = value;
        }
        if let Some(value) = parse_var(&lookup, "REPRISE_FIRST_INTERVAL_DAYS")? {
            config.scheduler.first_interval_days = value;
        }
        if let Some(value) = parse_var(&lookup, "REPRISE_SECOND_INTERVAL_DAYS")? {
            config.scheduler.second_interval_days = value;
        }
        if let Some(value) = parse_var(&lookup, "REPRISE_FAILURE_INTERVAL_DAYS")? {
            config.scheduler.failure_interval_days = value;
        }
        if let Some(value) = parse_var(&lookup, "REPRISE_MAX_INTERVAL_DAYS")? {
            config.scheduler.max_interval_days = value;
        }
        if let Some(value) = parse_var(&lookup, "REPRISE_SESSION_LIMIT")? {
            config.due.session_limit = Some(value);
        }

        config.validate()?;
        Ok(config)
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    pub fn validate(&self) -> RepriseResult<()> {
        self.scheduler.validate()?;
        if self.due.session_limit == Some(0) {
            return Err(RepriseError::Configuration(
                "session_limit must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> RepriseResult<Option<T>> {
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| RepriseError::Configuration(format!("{name} has invalid value '{raw}'"))),
        None => Ok(None),
    }
}

/// Builder for EngineConfig.
#[derive(Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set scheduler configuration.
    pub fn scheduler(mut self, config: SchedulerConfig) -> Self {
        self.config.scheduler = config;
        self
    }

    /// Set the minimum ease factor.
    pub fn min_ease_factor(mut self, value: f64) -> Self {
        self.config.scheduler.min_ease_factor = value;
        self
    }

    /// Set the maximum interval.
    pub fn max_interval_days(mut self, days: u32) -> Self {
        self.config.scheduler.max_interval_days = days;
        self
    }

    /// Cap the number of due cards per session.
    pub fn session_limit(mut self, limit: usize) -> Self {
        self.config.due.session_limit = Some(limit);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> RepriseResult<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
