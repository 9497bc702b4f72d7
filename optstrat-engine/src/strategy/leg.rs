//! Option legs.
//!
//! A leg is one option contract within a multi-leg strategy. Legs are
//! immutable once constructed; every field is read through an accessor.

use serde::{Deserialize, Serialize};

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

/// Side of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Bought (premium paid).
    Long,
    /// Sold (premium received).
    Short,
}

impl Side {
    /// +1 for long, -1 for short.
    pub fn sign(&self) -> f64 {
        match self {
            Self::Long => 1.0,
            Self::Short => -1.0,
        }
    }
}

/// A single option leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    strike: f64,
    premium: f64,
    quantity: i32,
    option_type: OptionType,
    side: Side,
}

impl Leg {
    pub fn new(option_type: OptionType, side: Side, strike: f64, premium: f64, quantity: i32) -> Self {
        Self {
            strike,
            premium,
            quantity,
            option_type,
            side,
        }
    }

    pub fn long_call(strike: f64, premium: f64, quantity: i32) -> Self {
        Self::new(OptionType::Call, Side::Long, strike, premium, quantity)
    }

    pub fn short_call(strike: f64, premium: f64, quantity: i32) -> Self {
        Self::new(OptionType::Call, Side::Short, strike, premium, quantity)
    }

    pub fn long_put(strike: f64, premium: f64, quantity: i32) -> Self {
        Self::new(OptionType::Put, Side::Long, strike, premium, quantity)
    }

    pub fn short_put(strike: f64, premium: f64, quantity: i32) -> Self {
        Self::new(OptionType::Put, Side::Short, strike, premium, quantity)
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn premium(&self) -> f64 {
        self.premium
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_short(&self) -> bool {
        self.side == Side::Short
    }

    /// Intrinsic value of one contract at `price`.
    pub fn intrinsic(&self, price: f64) -> f64 {
        match self.option_type {
            OptionType::Call => (price - self.strike).max(0.0),
            OptionType::Put => (self.strike - price).max(0.0),
        }
    }

    /// P&L per unit at expiry, before quantity and lot size.
    pub fn unit_payoff(&self, price: f64) -> f64 {
        self.side.sign() * (self.intrinsic(price) - self.premium)
    }

    /// P&L at expiry scaled by quantity and lot size.
    pub fn payoff(&self, price: f64, lot_size: u32) -> f64 {
        self.unit_payoff(price) * self.quantity as f64 * lot_size as f64
    }

    /// Slope of the scaled payoff as the underlying goes to +infinity.
    ///
    /// Only calls keep gaining intrinsic value above the strike.
    pub fn upside_slope(&self, lot_size: u32) -> f64 {
        match self.option_type {
            OptionType::Call => self.side.sign() * self.quantity as f64 * lot_size as f64,
            OptionType::Put => 0.0,
        }
    }
}
