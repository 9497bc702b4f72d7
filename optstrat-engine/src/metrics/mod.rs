//! Performance metrics module.
//!
//! Aggregates simulated trades into:
//! - Win rate, average win/loss, profit factor
//! - Sharpe ratio
//! - Maximum drawdown
//! - Monthly P&L breakdown

pub mod calculator;

pub use calculator::{BacktestResult, MonthlyPnl, PerformanceAnalyzer, TRADING_DAYS_PER_YEAR};
