//! Strategy configuration and validation.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, DegenerateInputError, EngineResult};

use super::kind::StrategyKind;
use super::leg::Leg;

fn default_lot_size() -> u32 {
    1
}

/// A complete multi-leg strategy definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Strategy kind; fixes the number of legs.
    pub kind: StrategyKind,
    /// Ordered legs. The first leg's strike is the primary strike.
    pub legs: Vec<Leg>,
    /// Current underlying price.
    pub spot_price: f64,
    /// Calendar days until expiry. Required: 0 means the position expires
    /// today and the outcome is read from the spot price.
    pub days_to_expiry: i32,
    /// Implied volatility in percent (e.g. 14.5).
    #[serde(default)]
    pub implied_volatility_pct: f64,
    /// Units of underlying per contract.
    #[serde(default = "default_lot_size")]
    pub lot_size: u32,
}

impl StrategyConfig {
    pub fn builder(kind: StrategyKind, spot_price: f64, days_to_expiry: i32) -> StrategyBuilder {
        StrategyBuilder::new(kind, spot_price, days_to_expiry)
    }

    /// Reject malformed configurations before any computation runs.
    pub fn validate(&self) -> EngineResult<()> {
        let expected = self.kind.leg_count();
        if self.legs.len() != expected {
            return Err(ConfigurationError::LegCountMismatch {
                kind: self.kind,
                expected,
                actual: self.legs.len(),
            }
            .into());
        }

        for (index, leg) in self.legs.iter().enumerate() {
            if leg.quantity() <= 0 {
                return Err(ConfigurationError::NonPositiveQuantity {
                    index,
                    quantity: leg.quantity(),
                }
                .into());
            }
            if !(leg.strike() > 0.0) || !leg.strike().is_finite() {
                return Err(ConfigurationError::NonPositiveStrike {
                    index,
                    strike: leg.strike(),
                }
                .into());
            }
            if !(leg.premium() >= 0.0) || !leg.premium().is_finite() {
                return Err(ConfigurationError::NegativePremium {
                    index,
                    premium: leg.premium(),
                }
                .into());
            }
        }

        if self.days_to_expiry < 0 {
            return Err(ConfigurationError::NegativeDaysToExpiry(self.days_to_expiry).into());
        }
        if !(self.implied_volatility_pct >= 0.0) || !self.implied_volatility_pct.is_finite() {
            return Err(ConfigurationError::InvalidVolatility(self.implied_volatility_pct).into());
        }
        if self.lot_size == 0 {
            return Err(ConfigurationError::ZeroLotSize.into());
        }

        if !(self.spot_price > 0.0) || !self.spot_price.is_finite() {
            return Err(DegenerateInputError::NonPositiveSpot(self.spot_price).into());
        }

        Ok(())
    }

    /// Total P&L at expiry if the underlying settles at `price`.
    pub fn pnl_at(&self, price: f64) -> f64 {
        self.legs.iter().map(|l| l.payoff(price, self.lot_size)).sum()
    }

    /// Strike of the first leg.
    pub fn primary_strike(&self) -> Option<f64> {
        self.legs.first().map(|l| l.strike())
    }

    /// Net slope of the P&L curve above the highest strike.
    pub fn upside_slope(&self) -> f64 {
        self.legs.iter().map(|l| l.upside_slope(self.lot_size)).sum()
    }

    /// Total quantity sold across short legs.
    pub fn short_quantity(&self) -> i64 {
        self.legs
            .iter()
            .filter(|l| l.is_short())
            .map(|l| l.quantity() as i64)
            .sum()
    }

    pub fn min_strike(&self) -> Option<f64> {
        self.legs.iter().map(|l| l.strike()).reduce(f64::min)
    }

    pub fn max_strike(&self) -> Option<f64> {
        self.legs.iter().map(|l| l.strike()).reduce(f64::max)
    }
}

/// Builder for strategy configurations.
pub struct StrategyBuilder {
    kind: StrategyKind,
    legs: Vec<Leg>,
    spot_price: f64,
    days_to_expiry: i32,
    implied_volatility_pct: f64,
    lot_size: u32,
}

impl StrategyBuilder {
    pub fn new(kind: StrategyKind, spot_price: f64, days_to_expiry: i32) -> Self {
        Self {
            kind,
            legs: Vec::with_capacity(kind.leg_count()),
            spot_price,
            days_to_expiry,
            implied_volatility_pct: 0.0,
            lot_size: 1,
        }
    }

    pub fn leg(mut self, leg: Leg) -> Self {
        self.legs.push(leg);
        self
    }

    pub fn volatility(mut self, pct: f64) -> Self {
        self.implied_volatility_pct = pct;
        self
    }

    pub fn lot_size(mut self, lot_size: u32) -> Self {
        self.lot_size = lot_size;
        self
    }

    /// Build and validate.
    pub fn build(self) -> EngineResult<StrategyConfig> {
        let config = StrategyConfig {
            kind: self.kind,
            legs: self.legs,
            spot_price: self.spot_price,
            days_to_expiry: self.days_to_expiry,
            implied_volatility_pct: self.implied_volatility_pct,
            lot_size: self.lot_size,
        };
        config.validate()?;
        Ok(config)
    }
}
