//! Simulated trades.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A completed trade. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    date: NaiveDate,
    entry_price: Decimal,
    exit_price: Decimal,
    pnl: Decimal,
    duration_label: String,
}

impl Trade {
    /// Create a trade; P&L is `(exit - entry) x lot_size`.
    pub fn new(
        date: NaiveDate,
        entry_price: Decimal,
        exit_price: Decimal,
        lot_size: u32,
        holding_days: u32,
    ) -> Self {
        Self {
            date,
            entry_price,
            exit_price,
            pnl: (exit_price - entry_price) * Decimal::from(lot_size),
            duration_label: format!("{}d", holding_days),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn entry_price(&self) -> Decimal {
        self.entry_price
    }

    pub fn exit_price(&self) -> Decimal {
        self.exit_price
    }

    /// Realized P&L.
    pub fn pnl(&self) -> Decimal {
        self.pnl
    }

    /// Holding period, e.g. "3d".
    pub fn duration_label(&self) -> &str {
        &self.duration_label
    }

    /// Check if trade was profitable.
    pub fn is_winner(&self) -> bool {
        self.pnl > Decimal::ZERO
    }
}
