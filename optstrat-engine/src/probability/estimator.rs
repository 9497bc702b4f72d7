//! Probability-of-profit heuristic.
//!
//! This is a display approximation, not an options-pricing model. It does
//! not integrate a price distribution over the payoff curve; it nudges a 50%
//! base by moneyness in the direction of the strategy's bias and subtracts a
//! volatility penalty. Do not use it for sizing or risk decisions.
//!
//! estimate = base
//!          + direction x (spot / primary_strike - 1) x moneyness_weight
//!          - iv_pct / 100 x volatility_weight
//!
//! clamped to [0, 100]. Neutral strategies (straddles, strangles, condors,
//! butterflies) have direction 0 and ignore moneyness.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::strategy::StrategyConfig;

/// Heuristic weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbabilityConfig {
    /// Starting estimate in percent.
    pub base_pct: f64,
    /// Points added per unit of (spot / strike - 1).
    pub moneyness_weight: f64,
    /// Points subtracted per 100% of implied volatility.
    pub volatility_weight: f64,
}

impl Default for ProbabilityConfig {
    fn default() -> Self {
        Self {
            base_pct: 50.0,
            moneyness_weight: 100.0,
            volatility_weight: 20.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProbabilityEstimator {
    config: ProbabilityConfig,
}

impl ProbabilityEstimator {
    pub fn new(config: ProbabilityConfig) -> Self {
        Self { config }
    }

    /// Approximate probability of profit in percent.
    pub fn estimate(&self, strategy: &StrategyConfig) -> EngineResult<f64> {
        strategy.validate()?;

        let spot = strategy.spot_price;

        // At expiry the outcome is already known.
        if strategy.days_to_expiry == 0 {
            return Ok(if strategy.pnl_at(spot) > 0.0 { 100.0 } else { 0.0 });
        }

        let strike = strategy.primary_strike().unwrap_or(spot);
        let moneyness = (spot / strike - 1.0) * self.config.moneyness_weight;
        let directional = strategy.kind.bias().direction() * moneyness;
        let volatility_penalty =
            strategy.implied_volatility_pct / 100.0 * self.config.volatility_weight;

        Ok((self.config.base_pct + directional - volatility_penalty).clamp(0.0, 100.0))
    }
}

/// Estimate with default weights.
pub fn estimate_profit_probability(strategy: &StrategyConfig) -> EngineResult<f64> {
    ProbabilityEstimator::default().estimate(strategy)
}
