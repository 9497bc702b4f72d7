//! Engine settings.
//!
//! All tunables live here and load from TOML; missing sections fall back to
//! the built-in defaults (see `config/default.toml`).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backtest::{BacktestSimulator, SimulatorConfig};
use crate::payoff::{PayoffConfig, PayoffEngine, MIN_GRID_POINTS};
use crate::probability::{ProbabilityConfig, ProbabilityEstimator};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub payoff: PayoffConfig,
    pub probability: ProbabilityConfig,
    pub simulation: SimulatorConfig,
}

impl EngineSettings {
    /// Load settings from a TOML file path.
    pub fn from_toml(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate settings from a TOML string.
    pub fn from_toml_str(s: &str) -> SettingsResult<Self> {
        let settings: Self = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> SettingsResult<()> {
        let payoff = &self.payoff;
        if payoff.grid_points < MIN_GRID_POINTS {
            return Err(SettingsError::Invalid(format!(
                "payoff.grid_points must be at least {}, got {}",
                MIN_GRID_POINTS, payoff.grid_points
            )));
        }
        if !(payoff.lower_bound_factor > 0.0 && payoff.lower_bound_factor <= 1.0) {
            return Err(SettingsError::Invalid(format!(
                "payoff.lower_bound_factor must be in (0, 1], got {}",
                payoff.lower_bound_factor
            )));
        }
        if !(payoff.upper_bound_factor >= 1.0) {
            return Err(SettingsError::Invalid(format!(
                "payoff.upper_bound_factor must be >= 1, got {}",
                payoff.upper_bound_factor
            )));
        }
        if !(payoff.undefined_risk_margin_pct > 0.0) {
            return Err(SettingsError::Invalid(
                "payoff.undefined_risk_margin_pct must be positive".to_string(),
            ));
        }

        self.simulation
            .validate()
            .map_err(|e| SettingsError::Invalid(format!("simulation: {}", e)))
    }

    pub fn payoff_engine(&self) -> PayoffEngine {
        PayoffEngine::new(self.payoff.clone())
    }

    pub fn probability_estimator(&self) -> ProbabilityEstimator {
        ProbabilityEstimator::new(self.probability.clone())
    }

    pub fn simulator(&self) -> BacktestSimulator {
        BacktestSimulator::new(self.simulation.clone())
    }
}
