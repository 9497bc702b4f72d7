//! Strategy kinds and their fixed leg shapes.

use serde::{Deserialize, Serialize};

/// Net directional bias of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

impl Bias {
    /// Direction in which moneyness above 1 is rewarded.
    pub fn direction(&self) -> f64 {
        match self {
            Self::Bullish => 1.0,
            Self::Bearish => -1.0,
            Self::Neutral => 0.0,
        }
    }
}

/// Supported option strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    LongCall,
    LongPut,
    ShortCall,
    ShortPut,
    BullCallSpread,
    BearPutSpread,
    BullPutSpread,
    BearCallSpread,
    LongStraddle,
    ShortStraddle,
    LongStrangle,
    ShortStrangle,
    IronCondor,
    IronButterfly,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 14] = [
        Self::LongCall,
        Self::LongPut,
        Self::ShortCall,
        Self::ShortPut,
        Self::BullCallSpread,
        Self::BearPutSpread,
        Self::BullPutSpread,
        Self::BearCallSpread,
        Self::LongStraddle,
        Self::ShortStraddle,
        Self::LongStrangle,
        Self::ShortStrangle,
        Self::IronCondor,
        Self::IronButterfly,
    ];

    /// Number of legs the strategy must have.
    pub fn leg_count(&self) -> usize {
        match self {
            Self::LongCall | Self::LongPut | Self::ShortCall | Self::ShortPut => 1,
            Self::IronCondor | Self::IronButterfly => 4,
            _ => 2,
        }
    }

    pub fn bias(&self) -> Bias {
        match self {
            Self::LongCall | Self::ShortPut | Self::BullCallSpread | Self::BullPutSpread => {
                Bias::Bullish
            }
            Self::LongPut | Self::ShortCall | Self::BearPutSpread | Self::BearCallSpread => {
                Bias::Bearish
            }
            _ => Bias::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LongCall => "long-call",
            Self::LongPut => "long-put",
            Self::ShortCall => "short-call",
            Self::ShortPut => "short-put",
            Self::BullCallSpread => "bull-call-spread",
            Self::BearPutSpread => "bear-put-spread",
            Self::BullPutSpread => "bull-put-spread",
            Self::BearCallSpread => "bear-call-spread",
            Self::LongStraddle => "long-straddle",
            Self::ShortStraddle => "short-straddle",
            Self::LongStrangle => "long-strangle",
            Self::ShortStrangle => "short-strangle",
            Self::IronCondor => "iron-condor",
            Self::IronButterfly => "iron-butterfly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        Self::ALL.iter().copied().find(|k| k.as_str() == normalized)
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
