//! Lookup tables for the trade simulator.
//!
//! Per-strategy return models and per-asset contract profiles. Both are
//! plain configuration so callers and tests can substitute their own.

use serde::{Deserialize, Serialize};

use crate::strategy::StrategyKind;

/// Expected per-trade return and its spread for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnModel {
    pub strategy: StrategyKind,
    /// Mean return on entry premium per trade (0.02 = 2%).
    pub base_return: f64,
    /// Width of the uniform return draw around the mean.
    pub volatility: f64,
}

/// Contract profile of an underlying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetProfile {
    pub symbol: String,
    /// Units of underlying per contract.
    pub lot_size: u32,
    /// Typical option premium used as the synthetic entry price.
    pub reference_premium: f64,
}

impl AssetProfile {
    pub fn new(symbol: &str, lot_size: u32, reference_premium: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            lot_size,
            reference_premium,
        }
    }
}

pub fn default_return_models() -> Vec<ReturnModel> {
    use StrategyKind::*;

    [
        (LongCall, 0.020, 0.60),
        (LongPut, 0.015, 0.60),
        (ShortCall, 0.010, 0.35),
        (ShortPut, 0.012, 0.35),
        (BullCallSpread, 0.015, 0.40),
        (BearPutSpread, 0.012, 0.40),
        (BullPutSpread, 0.010, 0.25),
        (BearCallSpread, 0.008, 0.25),
        (LongStraddle, 0.010, 0.70),
        (ShortStraddle, 0.012, 0.30),
        (LongStrangle, 0.008, 0.75),
        (ShortStrangle, 0.010, 0.30),
        (IronCondor, 0.008, 0.20),
        (IronButterfly, 0.010, 0.25),
    ]
    .into_iter()
    .map(|(strategy, base_return, volatility)| ReturnModel {
        strategy,
        base_return,
        volatility,
    })
    .collect()
}

pub fn default_assets() -> Vec<AssetProfile> {
    vec![
        AssetProfile::new("NIFTY", 50, 150.0),
        AssetProfile::new("BANKNIFTY", 15, 350.0),
        AssetProfile::new("FINNIFTY", 40, 120.0),
        AssetProfile::new("MIDCPNIFTY", 75, 80.0),
        AssetProfile::new("SENSEX", 10, 400.0),
    ]
}
