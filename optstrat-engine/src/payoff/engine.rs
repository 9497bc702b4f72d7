//! Grid-based payoff evaluator.
//!
//! Works for any leg combination:
//! 1. Sample the expiry P&L on a fine price grid that also contains every
//!    strike and the zero price, so each kink is hit exactly
//! 2. Read max profit/loss from the samples, using the net call slope to
//!    detect an unbounded right tail
//! 3. Locate zero crossings by linear interpolation between samples
//! 4. Derive margin and the ratios built on it

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DegenerateInputError, EngineResult};
use crate::strategy::StrategyConfig;

use super::result::{Extent, PayoffPoint, PayoffResult};

/// Lowest grid resolution the engine accepts.
pub const MIN_GRID_POINTS: usize = 500;

/// Relative tolerance under which a sampled P&L counts as zero.
const ZERO_TOLERANCE: f64 = 1e-9;

/// Payoff engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoffConfig {
    /// Number of evenly spaced grid samples (strikes are added on top).
    pub grid_points: usize,

    /// Grid starts at this fraction of min(spot, lowest strike).
    pub lower_bound_factor: f64,

    /// Grid ends at this multiple of max(spot, highest strike).
    pub upper_bound_factor: f64,

    /// Margin for undefined-risk positions, as a percentage of the notional
    /// value of the short legs (spot x lot size x short quantity).
    pub undefined_risk_margin_pct: f64,
}

impl Default for PayoffConfig {
    fn default() -> Self {
        Self {
            grid_points: 1000,
            lower_bound_factor: 0.5,
            upper_bound_factor: 1.5,
            undefined_risk_margin_pct: 15.0,
        }
    }
}

/// Computes expiry payoff statistics for strategy configurations.
#[derive(Debug, Clone, Default)]
pub struct PayoffEngine {
    config: PayoffConfig,
}

impl PayoffEngine {
    pub fn new(config: PayoffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PayoffConfig {
        &self.config
    }

    /// Full payoff analysis.
    pub fn compute(&self, strategy: &StrategyConfig) -> EngineResult<PayoffResult> {
        strategy.validate()?;

        let points = self.sample(strategy);
        let upside_slope = strategy.upside_slope();

        let (sup, inf) = points
            .iter()
            .fold((f64::NEG_INFINITY, f64::INFINITY), |(hi, lo), p| {
                (hi.max(p.pnl), lo.min(p.pnl))
            });

        let max_profit = if upside_slope > 0.0 {
            Extent::Unlimited
        } else {
            Extent::Bounded(non_negative(sup))
        };
        let max_loss = if upside_slope < 0.0 {
            Extent::Unlimited
        } else {
            Extent::Bounded(non_negative(-inf))
        };

        let breakevens = find_breakevens(&points, upside_slope);
        let margin_required = self.margin(strategy, max_loss);
        let risk_reward_ratio = risk_reward(max_profit, max_loss);
        let return_on_margin = return_on_margin(max_profit, margin_required)?;

        debug!(
            kind = %strategy.kind,
            samples = points.len(),
            breakevens = breakevens.len(),
            "payoff computed"
        );

        Ok(PayoffResult {
            max_profit,
            max_loss,
            breakevens,
            margin_required,
            risk_reward_ratio,
            return_on_margin,
            net_premium: net_premium(strategy),
        })
    }

    /// Sampled expiry P&L curve, ascending in price.
    pub fn curve(&self, strategy: &StrategyConfig) -> EngineResult<Vec<PayoffPoint>> {
        strategy.validate()?;
        Ok(self.sample(strategy))
    }

    fn sample(&self, strategy: &StrategyConfig) -> Vec<PayoffPoint> {
        self.sample_prices(strategy)
            .into_iter()
            .map(|price| PayoffPoint {
                price,
                pnl: strategy.pnl_at(price),
            })
            .collect()
    }

    fn sample_prices(&self, strategy: &StrategyConfig) -> Vec<f64> {
        let spot = strategy.spot_price;
        let low = strategy.min_strike().map_or(spot, |k| k.min(spot)) * self.config.lower_bound_factor;
        let high = strategy.max_strike().map_or(spot, |k| k.max(spot)) * self.config.upper_bound_factor;

        let n = self.config.grid_points.max(MIN_GRID_POINTS);
        let step = (high - low) / (n - 1) as f64;

        let mut prices: Vec<f64> = (0..n).map(|i| low + step * i as f64).collect();
        prices.push(0.0);
        prices.extend(strategy.legs.iter().map(|l| l.strike()));
        prices.sort_by(|a, b| a.total_cmp(b));
        prices.dedup();
        prices
    }

    fn margin(&self, strategy: &StrategyConfig, max_loss: Extent) -> f64 {
        match max_loss {
            Extent::Bounded(loss) => loss,
            Extent::Unlimited => {
                let notional = strategy.spot_price
                    * strategy.lot_size as f64
                    * strategy.short_quantity() as f64;
                notional * self.config.undefined_risk_margin_pct / 100.0
            }
        }
    }
}

/// Payoff analysis with the default engine configuration.
pub fn compute_payoff(strategy: &StrategyConfig) -> EngineResult<PayoffResult> {
    PayoffEngine::default().compute(strategy)
}

fn non_negative(x: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        0.0
    }
}

fn net_premium(strategy: &StrategyConfig) -> f64 {
    strategy
        .legs
        .iter()
        .map(|l| -l.side().sign() * l.premium() * l.quantity() as f64 * strategy.lot_size as f64)
        .sum()
}

fn risk_reward(max_profit: Extent, max_loss: Extent) -> Extent {
    match (max_profit, max_loss) {
        (Extent::Unlimited, _) => Extent::Unlimited,
        (Extent::Bounded(_), Extent::Unlimited) => Extent::Bounded(0.0),
        (Extent::Bounded(profit), Extent::Bounded(loss)) if loss > 0.0 => {
            Extent::Bounded(profit / loss)
        }
        // Riskless position
        (Extent::Bounded(profit), Extent::Bounded(_)) if profit > 0.0 => Extent::Unlimited,
        (Extent::Bounded(_), Extent::Bounded(_)) => Extent::Bounded(0.0),
    }
}

fn return_on_margin(max_profit: Extent, margin: f64) -> EngineResult<Extent> {
    match max_profit {
        Extent::Unlimited => Ok(Extent::Unlimited),
        Extent::Bounded(profit) => {
            if margin > 0.0 {
                Ok(Extent::Bounded(profit / margin * 100.0))
            } else {
                Err(DegenerateInputError::ZeroMargin.into())
            }
        }
    }
}

/// Zero crossings of a sampled piecewise-linear curve.
///
/// Touching zero without changing sign is not a crossing. A flat run at zero
/// between opposite signs reports the start of the run. A crossing beyond the
/// last sample is extrapolated from the right-tail slope.
fn find_breakevens(points: &[PayoffPoint], upside_slope: f64) -> Vec<f64> {
    let scale = points.iter().map(|p| p.pnl.abs()).fold(1.0, f64::max);
    let tolerance = scale * ZERO_TOLERANCE;
    let sign = |v: f64| -> i8 {
        if v > tolerance {
            1
        } else if v < -tolerance {
            -1
        } else {
            0
        }
    };

    let mut breakevens = Vec::new();
    let mut last_nonzero: Option<&PayoffPoint> = None;
    let mut zero_run_start: Option<f64> = None;

    for point in points {
        let s = sign(point.pnl);
        if s == 0 {
            zero_run_start.get_or_insert(point.price);
            continue;
        }
        if let Some(prev) = last_nonzero {
            if sign(prev.pnl) != s {
                let crossing = zero_run_start.unwrap_or_else(|| interpolate_zero(prev, point));
                breakevens.push(crossing);
            }
        }
        last_nonzero = Some(point);
        zero_run_start = None;
    }

    let tail_sign: i8 = if upside_slope > 0.0 {
        1
    } else if upside_slope < 0.0 {
        -1
    } else {
        0
    };

    if tail_sign != 0 {
        if let Some(last) = points.last() {
            match sign(last.pnl) {
                0 => {
                    // Curve ends on zero and leaves it through the tail
                    if let (Some(prev), Some(start)) = (last_nonzero, zero_run_start) {
                        if sign(prev.pnl) == -tail_sign {
                            breakevens.push(start);
                        }
                    }
                }
                s if s == -tail_sign => breakevens.push(last.price - last.pnl / upside_slope),
                _ => {}
            }
        }
    }

    breakevens
}

fn interpolate_zero(a: &PayoffPoint, b: &PayoffPoint) -> f64 {
    a.price - a.pnl * (b.price - a.price) / (b.pnl - a.pnl)
}
