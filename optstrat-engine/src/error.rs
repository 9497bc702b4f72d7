//! Engine error taxonomy.
//!
//! Configuration and degenerate-input errors are surfaced to callers;
//! numeric edge cases (zero variance, no trades, no breakeven) are handled
//! locally where they occur and never appear here.

use thiserror::Error;

use crate::strategy::StrategyKind;

/// The strategy configuration is malformed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("{kind} requires {expected} legs, got {actual}")]
    LegCountMismatch {
        kind: StrategyKind,
        expected: usize,
        actual: usize,
    },

    #[error("leg {index}: quantity must be positive, got {quantity}")]
    NonPositiveQuantity { index: usize, quantity: i32 },

    #[error("leg {index}: strike must be positive, got {strike}")]
    NonPositiveStrike { index: usize, strike: f64 },

    #[error("leg {index}: premium must be non-negative, got {premium}")]
    NegativePremium { index: usize, premium: f64 },

    #[error("days to expiry must be non-negative, got {0}")]
    NegativeDaysToExpiry(i32),

    #[error("implied volatility must be a non-negative percentage, got {0}")]
    InvalidVolatility(f64),

    #[error("lot size must be positive")]
    ZeroLotSize,
}

/// Inputs are well-formed but the computation has no meaningful answer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DegenerateInputError {
    #[error("spot price must be positive, got {0}")]
    NonPositiveSpot(f64),

    #[error("margin is zero; return on margin is undefined")]
    ZeroMargin,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Degenerate input: {0}")]
    DegenerateInput(#[from] DegenerateInputError),
}

pub type EngineResult<T> = Result<T, EngineError>;
