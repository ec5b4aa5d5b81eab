// Scheduler configuration.
//
// Objective weights, solver limits and report policy, loadable from TOML.
// Every field has a default, so a file only names what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{SchedulerError, SolverBackend, SolverConfig};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for SchedulerError {
    fn from(err: ConfigError) -> Self {
        SchedulerError::InvalidConfig(err.to_string())
    }
}

/// Weights of the objective terms. Meeting demand dominates by default.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObjectiveWeights {
    /// Per unit of wage cost (wage × hours)
    pub wage: f64,
    /// Per unmet demand item
    pub unmet: f64,
    /// Per hour of deviation from preferred hours
    pub hours: f64,
    /// Per hour between the busiest and the idlest employee
    pub fairness: f64,
    /// Reward per preferred slot worked
    pub slot_preference: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            wage: 100.0,
            unmet: 100_000.0,
            hours: 50.0,
            fairness: 10.0,
            slot_preference: 1.0,
        }
    }
}

/// Policy knobs of the management reports.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InsightsConfig {
    /// Value of one unmet demand item, for opportunity cost
    pub unmet_item_value: f64,
    /// Capacity utilization (percent) at which a role counts as saturated
    pub bottleneck_utilization: f64,
    /// Weekly hours assumed for a new hire
    pub full_time_hours: f64,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            unmet_item_value: 5.0,
            bottleneck_utilization: 90.0,
            full_time_hours: 40.0,
        }
    }
}

/// Main scheduler configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Used when the caller passes no limit
    pub time_limit_seconds: f64,
    pub random_seed: i32,
    pub gap_tolerance: Option<f64>,
    pub backend: SolverBackend,
    /// Echo solver output
    pub verbose: bool,
    pub weights: ObjectiveWeights,
    pub insights: InsightsConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            time_limit_seconds: 60.0,
            random_seed: 0,
            gap_tolerance: None,
            backend: SolverBackend::Auto,
            verbose: false,
            weights: ObjectiveWeights::default(),
            insights: InsightsConfig::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit_seconds = seconds;
        self
    }

    pub fn with_random_seed(mut self, seed: i32) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        if !(self.time_limit_seconds.is_finite() && self.time_limit_seconds > 0.0) {
            errors.push(format!(
                "time_limit_seconds must be positive, got {}",
                self.time_limit_seconds
            ));
        }
        if let Some(gap) = self.gap_tolerance {
            if !(0.0..=1.0).contains(&gap) {
                errors.push(format!("gap_tolerance must be within [0, 1], got {}", gap));
            }
        }
        let weights = [
            ("wage", self.weights.wage),
            ("unmet", self.weights.unmet),
            ("hours", self.weights.hours),
            ("fairness", self.weights.fairness),
            ("slot_preference", self.weights.slot_preference),
        ];
        for (name, value) in weights {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(format!("weights.{} must be non-negative, got {}", name, value));
            }
        }
        if !(self.insights.unmet_item_value.is_finite() && self.insights.unmet_item_value >= 0.0) {
            errors.push("insights.unmet_item_value must be non-negative".to_string());
        }
        if !(self.insights.full_time_hours.is_finite() && self.insights.full_time_hours > 0.0) {
            errors.push("insights.full_time_hours must be positive".to_string());
        }
        if !(0.0..=100.0).contains(&self.insights.bottleneck_utilization) {
            errors.push(format!(
                "insights.bottleneck_utilization must be a percentage, got {}",
                self.insights.bottleneck_utilization
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors.join("; ")))
        }
    }

    /// Program-level solver settings for one request.
    pub fn solver_config(&self, time_limit_seconds: Option<f64>) -> SolverConfig {
        SolverConfig {
            backend: self.backend,
            time_limit: Some(time_limit_seconds.unwrap_or(self.time_limit_seconds)),
            gap_tolerance: self.gap_tolerance,
            random_seed: Some(self.random_seed),
            verbose: self.verbose,
        }
    }
}
