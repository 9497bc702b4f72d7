//! Seeded synthetic trade simulator.
//!
//! For every trading day in the requested range:
//! 1. Draw a synthetic entry premium around the asset's reference premium
//! 2. Draw a return `base_return + (u - 0.5) x volatility` for the strategy
//! 3. Exit at `entry x (1 + return)`, floored at zero
//! 4. P&L = `(exit - entry) x lot_size`
//!
//! All draws come from a ChaCha8 stream seeded by the caller, so identical
//! inputs always produce identical trade sequences.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::strategy::StrategyKind;

use super::tables::{default_assets, default_return_models, AssetProfile, ReturnModel};
use super::trade::Trade;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    #[error("No return model for strategy {0}")]
    UnknownStrategy(StrategyKind),

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid simulator config: {0}")]
    InvalidConfig(String),

    #[error("Price {0} cannot be represented as a decimal")]
    UnrepresentablePrice(f64),
}

pub type SimulationResult<T> = Result<T, SimulationError>;

/// Look-back window labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "2Y")]
    TwoYears,
}

impl Timeframe {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "1M" => Some(Self::OneMonth),
            "3M" => Some(Self::ThreeMonths),
            "6M" => Some(Self::SixMonths),
            "1Y" | "12M" => Some(Self::OneYear),
            "2Y" | "24M" => Some(Self::TwoYears),
            _ => None,
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            Self::OneMonth => 1,
            Self::ThreeMonths => 3,
            Self::SixMonths => 6,
            Self::OneYear => 12,
            Self::TwoYears => 24,
        }
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> SimulationResult<Self> {
        if end < start {
            return Err(SimulationError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range covering `timeframe` up to and including `end`.
    pub fn trailing(end: NaiveDate, timeframe: Timeframe) -> Self {
        let start = end
            .checked_sub_months(Months::new(timeframe.months()))
            .and_then(|d| d.succ_opt())
            .unwrap_or(end);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Weekdays in the range, ascending.
    pub fn trading_days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start
            .iter_days()
            .take_while(move |d| *d <= end)
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
    }
}

/// Simulator configuration and lookup tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Relative spread of the synthetic entry premium around the reference.
    pub premium_jitter: f64,
    /// Longest holding period used for duration labels.
    pub max_holding_days: u32,
    /// Return model per strategy.
    pub strategies: Vec<ReturnModel>,
    /// Contract profile per asset.
    pub assets: Vec<AssetProfile>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            premium_jitter: 0.5,
            max_holding_days: 5,
            strategies: default_return_models(),
            assets: default_assets(),
        }
    }
}

impl SimulatorConfig {
    pub fn return_model(&self, kind: StrategyKind) -> Option<&ReturnModel> {
        self.strategies.iter().find(|m| m.strategy == kind)
    }

    /// Case-insensitive asset lookup.
    pub fn asset(&self, symbol: &str) -> Option<&AssetProfile> {
        self.assets
            .iter()
            .find(|a| a.symbol.eq_ignore_ascii_case(symbol.trim()))
    }

    pub fn validate(&self) -> SimulationResult<()> {
        if !(self.premium_jitter >= 0.0 && self.premium_jitter < 2.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "premium_jitter must be in [0, 2), got {}",
                self.premium_jitter
            )));
        }
        if let Some(model) = self.strategies.iter().find(|m| {
            !m.base_return.is_finite() || !(m.volatility >= 0.0) || !m.volatility.is_finite()
        }) {
            return Err(SimulationError::InvalidConfig(format!(
                "return model for {} needs a finite base return and non-negative volatility",
                model.strategy
            )));
        }
        if let Some(asset) = self.assets.iter().find(|a| {
            a.lot_size == 0 || !(a.reference_premium > 0.0) || !a.reference_premium.is_finite()
        }) {
            return Err(SimulationError::InvalidConfig(format!(
                "asset {} needs a positive lot size and reference premium",
                asset.symbol
            )));
        }
        Ok(())
    }
}

/// Generates synthetic trade sequences.
#[derive(Debug, Clone, Default)]
pub struct BacktestSimulator {
    config: SimulatorConfig,
}

impl BacktestSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Simulate one trade per trading day in `range`.
    pub fn run(
        &self,
        asset: &str,
        strategy: StrategyKind,
        range: &DateRange,
        seed: u64,
    ) -> SimulationResult<Vec<Trade>> {
        self.config.validate()?;

        let profile = self
            .config
            .asset(asset)
            .ok_or_else(|| SimulationError::UnknownAsset(asset.to_string()))?;
        let model = self
            .config
            .return_model(strategy)
            .ok_or(SimulationError::UnknownStrategy(strategy))?;

        let max_holding = self.config.max_holding_days.max(1);
        let jitter = self.config.premium_jitter;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let trades: Vec<Trade> = range
            .trading_days()
            .map(|date| {
                let premium_draw: f64 = rng.gen();
                let return_draw: f64 = rng.gen();
                let holding_days = rng.gen_range(1..=max_holding);

                let entry = profile.reference_premium * (1.0 + (premium_draw - 0.5) * jitter);
                let ret = model.base_return + (return_draw - 0.5) * model.volatility;
                let exit = (entry * (1.0 + ret)).max(0.0);

                Ok(Trade::new(
                    date,
                    to_price(entry)?,
                    to_price(exit)?,
                    profile.lot_size,
                    holding_days,
                ))
            })
            .collect::<SimulationResult<_>>()?;

        debug!(
            asset = %profile.symbol,
            strategy = %strategy,
            seed,
            trades = trades.len(),
            "simulated trade sequence"
        );

        Ok(trades)
    }
}

/// Simulate with the built-in tables.
pub fn run_backtest(
    asset: &str,
    strategy: StrategyKind,
    range: &DateRange,
    seed: u64,
) -> SimulationResult<Vec<Trade>> {
    BacktestSimulator::default().run(asset, strategy, range, seed)
}

fn to_price(value: f64) -> SimulationResult<Decimal> {
    Decimal::try_from(value)
        .map(|d| d.round_dp(2))
        .map_err(|_| SimulationError::UnrepresentablePrice(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn one_year() -> DateRange {
        DateRange::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap()
    }

    #[test]
    fn test_trading_days_skip_weekends() {
        // Mon 2024-01-01 .. Sun 2024-01-07
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 7)).unwrap();
        let days: Vec<_> = range.trading_days().collect();
        assert_eq!(days.len(), 5);
        assert_eq!(days[0], date(2024, 1, 1));
        assert_eq!(days[4], date(2024, 1, 5));
    }

    #[test]
    fn test_invalid_range() {
        let err = DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_trailing_range() {
        let range = DateRange::trailing(date(2024, 12, 31), Timeframe::OneYear);
        assert_eq!(range.start(), date(2024, 1, 1));
        assert_eq!(range.end(), date(2024, 12, 31));
        assert_eq!(Timeframe::from_str("6m"), Some(Timeframe::SixMonths));
    }

    #[test]
    fn test_same_seed_reproduces_sequence() {
        let sim = BacktestSimulator::default();
        let a = sim.run("NIFTY", StrategyKind::IronCondor, &one_year(), 42).unwrap();
        let b = sim.run("NIFTY", StrategyKind::IronCondor, &one_year(), 42).unwrap();

        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
        assert_eq!(a.len(), one_year().trading_days().count());
    }

    #[test]
    fn test_different_seeds_differ() {
        let sim = BacktestSimulator::default();
        let a = sim.run("NIFTY", StrategyKind::LongCall, &one_year(), 1).unwrap();
        let b = sim.run("NIFTY", StrategyKind::LongCall, &one_year(), 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_deterministic_tables() {
        let sim = BacktestSimulator::new(SimulatorConfig {
            premium_jitter: 0.0,
            max_holding_days: 1,
            strategies: vec![ReturnModel {
                strategy: StrategyKind::BullCallSpread,
                base_return: 0.10,
                volatility: 0.0,
            }],
            assets: vec![AssetProfile::new("TEST", 10, 100.0)],
        });
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 5)).unwrap();
        let trades = sim.run("test", StrategyKind::BullCallSpread, &range, 7).unwrap();

        assert_eq!(trades.len(), 5);
        for trade in &trades {
            assert_eq!(trade.entry_price(), dec!(100.00));
            assert_eq!(trade.exit_price(), dec!(110.00));
            assert_eq!(trade.pnl(), dec!(100.00));
            assert_eq!(trade.duration_label(), "1d");
        }
    }

    #[test]
    fn test_unknown_lookups() {
        let sim = BacktestSimulator::new(SimulatorConfig {
            strategies: vec![],
            ..Default::default()
        });
        let err = sim.run("DOGE", StrategyKind::LongCall, &one_year(), 1).unwrap_err();
        assert_eq!(err, SimulationError::UnknownAsset("DOGE".to_string()));

        let err = sim.run("NIFTY", StrategyKind::LongCall, &one_year(), 1).unwrap_err();
        assert_eq!(err, SimulationError::UnknownStrategy(StrategyKind::LongCall));
    }

    #[test]
    fn test_exit_price_never_negative() {
        let sim = BacktestSimulator::new(SimulatorConfig {
            strategies: vec![ReturnModel {
                strategy: StrategyKind::LongPut,
                base_return: -0.5,
                volatility: 3.0,
            }],
            ..Default::default()
        });
        let trades = sim.run("BANKNIFTY", StrategyKind::LongPut, &one_year(), 9).unwrap();
        assert!(trades.iter().all(|t| t.exit_price() >= Decimal::ZERO));
        assert!(trades.iter().any(|t| t.exit_price().is_zero()));
    }

    #[test]
    fn test_rejects_invalid_tables_built_in_code() {
        let sim = BacktestSimulator::new(SimulatorConfig {
            assets: vec![AssetProfile::new("BAD", 25, f64::NAN)],
            ..Default::default()
        });
        let err = sim.run("BAD", StrategyKind::LongCall, &one_year(), 1).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig(_)));

        let sim = BacktestSimulator::new(SimulatorConfig {
            strategies: vec![ReturnModel {
                strategy: StrategyKind::LongCall,
                base_return: f64::INFINITY,
                volatility: 0.1,
            }],
            ..Default::default()
        });
        let err = sim.run("NIFTY", StrategyKind::LongCall, &one_year(), 1).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig(_)));
    }

    #[test]
    fn test_unrepresentable_price_is_an_error() {
        assert_eq!(to_price(101.456).unwrap(), dec!(101.46));
        assert_eq!(
            to_price(f64::NAN).unwrap_err().to_string(),
            SimulationError::UnrepresentablePrice(f64::NAN).to_string()
        );
        assert!(to_price(1e30).is_err());
    }
}
