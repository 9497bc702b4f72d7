//! Payoff value objects.

use serde::{Deserialize, Serialize};

/// A quantity that is either finite or unbounded.
///
/// Used for max profit/loss and the ratios derived from them so that
/// "unlimited" never leaks into arithmetic as a large number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Extent {
    Bounded(f64),
    Unlimited,
}

impl Extent {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// Finite value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Bounded(v) => Some(*v),
            Self::Unlimited => None,
        }
    }
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bounded(v) => write!(f, "{:.2}", v),
            Self::Unlimited => f.write_str("Unlimited"),
        }
    }
}

/// One sample of the expiry P&L curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffPoint {
    pub price: f64,
    pub pnl: f64,
}

/// Expiry payoff analysis of a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffResult {
    /// Best-case P&L at expiry (never negative).
    pub max_profit: Extent,
    /// Worst-case loss as a positive magnitude.
    pub max_loss: Extent,
    /// Zero crossings of the P&L curve, ascending.
    pub breakevens: Vec<f64>,
    /// Capital blocked for the position.
    pub margin_required: f64,
    /// Max profit divided by max loss.
    pub risk_reward_ratio: Extent,
    /// Max profit as a percentage of margin.
    pub return_on_margin: Extent,
    /// Premium received (positive) or paid (negative) at entry.
    pub net_premium: f64,
}

impl PayoffResult {
    /// Whether the worst case is known in advance.
    pub fn is_defined_risk(&self) -> bool {
        !self.max_loss.is_unlimited()
    }

    /// Generate summary string.
    pub fn summary(&self) -> String {
        let breakevens = if self.breakevens.is_empty() {
            "none".to_string()
        } else {
            self.breakevens
                .iter()
                .map(|b| format!("{:.2}", b))
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "Payoff at Expiry\n\
             ----------------------------------------\n\
             Max Profit: {}\n\
             Max Loss: {}\n\
             Breakevens: {}\n\
             Net Premium: {:.2}\n\
             Margin Required: {:.2}\n\
             Risk/Reward: {}\n\
             Return on Margin: {}%",
            self.max_profit,
            self.max_loss,
            breakevens,
            self.net_premium,
            self.margin_required,
            self.risk_reward_ratio,
            self.return_on_margin,
        )
    }
}
