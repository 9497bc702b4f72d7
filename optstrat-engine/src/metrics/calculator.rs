//! Performance analyzer.
//!
//! Aggregates a trade sequence into backtest statistics. Every statistic
//! is well defined for an empty sequence (all zeros).

use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::backtest::Trade;
use crate::payoff::Extent;

/// Trading days used to annualize the Sharpe ratio.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Aggregate statistics of a trade sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Analyzed trades, in order.
    pub trades: Vec<Trade>,

    // Basic statistics
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Percentage of trades with positive P&L (0-100).
    pub win_rate: f64,

    // P&L metrics
    pub total_pnl: Decimal,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub avg_win: Decimal,
    pub avg_loss: Decimal,
    pub largest_win: Decimal,
    pub largest_loss: Decimal,
    pub profit_factor: Extent,

    // Risk metrics
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,

    /// P&L by calendar month, ascending.
    pub monthly: Vec<MonthlyPnl>,
}

impl BacktestResult {
    /// Generate a summary report.
    pub fn summary(&self) -> String {
        let mut report = format!(
            "Backtest Results\n\
             ----------------------------------------\n\
             Trades: {} (W: {}, L: {})\n\
             Win Rate: {:.1}%\n\
             Profit Factor: {}\n\
             \n\
             Total P&L: {:.2}\n\
             Avg Win: {:.2}\n\
             Avg Loss: {:.2}\n\
             Largest Win: {:.2}\n\
             Largest Loss: {:.2}\n\
             \n\
             Max Drawdown: {:.2}%\n\
             Sharpe Ratio: {:.2}",
            self.total_trades,
            self.winning_trades,
            self.losing_trades,
            self.win_rate,
            self.profit_factor,
            self.total_pnl,
            self.avg_win,
            self.avg_loss,
            self.largest_win,
            self.largest_loss,
            self.max_drawdown_pct,
            self.sharpe_ratio,
        );

        if !self.monthly.is_empty() {
            report.push_str("\n\nMonthly P&L");
            for m in &self.monthly {
                report.push_str(&format!(
                    "\n  {}-{:02}: {:.2} ({} trades, {:.0}% win)",
                    m.year, m.month, m.pnl, m.trades, m.win_rate
                ));
            }
        }

        report
    }
}

/// P&L grouped by calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPnl {
    pub year: i32,
    pub month: u32,
    pub pnl: Decimal,
    pub trades: usize,
    pub win_rate: f64,
}

/// Performance analyzer.
pub struct PerformanceAnalyzer;

impl PerformanceAnalyzer {
    /// Calculate all statistics for a trade sequence.
    pub fn analyze(trades: Vec<Trade>) -> BacktestResult {
        let total_trades = trades.len();
        let winning_trades = trades.iter().filter(|t| t.is_winner()).count();
        let losing_trades = total_trades - winning_trades;
        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };

        let total_pnl: Decimal = trades.iter().map(|t| t.pnl()).sum();
        let gross_profit: Decimal = trades
            .iter()
            .filter(|t| t.is_winner())
            .map(|t| t.pnl())
            .sum();
        let gross_loss: Decimal = trades
            .iter()
            .filter(|t| !t.is_winner())
            .map(|t| t.pnl())
            .sum();

        let avg_win = if winning_trades > 0 {
            gross_profit / Decimal::from(winning_trades as i64)
        } else {
            Decimal::ZERO
        };

        let avg_loss = if losing_trades > 0 {
            gross_loss / Decimal::from(losing_trades as i64)
        } else {
            Decimal::ZERO
        };

        let largest_win = trades
            .iter()
            .filter(|t| t.is_winner())
            .map(|t| t.pnl())
            .max()
            .unwrap_or(Decimal::ZERO);

        let largest_loss = trades
            .iter()
            .filter(|t| !t.is_winner())
            .map(|t| t.pnl())
            .min()
            .unwrap_or(Decimal::ZERO);

        let pnls: Vec<f64> = trades.iter().map(|t| to_f64(t.pnl())).collect();
        let cumulative = cumulative_pnl(&pnls);

        BacktestResult {
            total_trades,
            winning_trades,
            losing_trades,
            win_rate,
            total_pnl,
            gross_profit,
            gross_loss,
            avg_win,
            avg_loss,
            largest_win,
            largest_loss,
            profit_factor: Self::profit_factor(gross_profit, gross_loss),
            max_drawdown_pct: Self::max_drawdown_pct(&cumulative),
            sharpe_ratio: Self::sharpe_ratio(&pnls),
            monthly: Self::monthly_breakdown(&trades),
            trades,
        }
    }

    /// Gross profit over absolute gross loss.
    fn profit_factor(gross_profit: Decimal, gross_loss: Decimal) -> Extent {
        let loss = to_f64(gross_loss.abs());
        let profit = to_f64(gross_profit);
        if loss == 0.0 {
            return if profit > 0.0 {
                Extent::Unlimited
            } else {
                Extent::Bounded(0.0)
            };
        }
        Extent::Bounded(profit / loss)
    }

    /// Largest peak-to-trough decline of a cumulative P&L series, in percent
    /// of the peak. Zero until the series first rises above zero.
    pub fn max_drawdown_pct(cumulative: &[f64]) -> f64 {
        let mut peak = 0.0_f64;
        let mut max_drawdown = 0.0_f64;

        for &value in cumulative {
            if value > peak {
                peak = value;
            }
            if peak > 0.0 {
                let drawdown = (peak - value) / peak * 100.0;
                max_drawdown = max_drawdown.max(drawdown);
            }
        }

        max_drawdown
    }

    /// Annualized Sharpe ratio of per-trade P&L (risk-free rate = 0),
    /// using the population standard deviation.
    pub fn sharpe_ratio(pnls: &[f64]) -> f64 {
        if pnls.is_empty() {
            return 0.0;
        }

        let mean = pnls.iter().mean();
        let std_dev = pnls.iter().population_std_dev();

        if !std_dev.is_finite() || std_dev <= f64::EPSILON * mean.abs().max(1.0) {
            return 0.0;
        }

        mean / std_dev * TRADING_DAYS_PER_YEAR.sqrt()
    }

    /// P&L by calendar month, ascending.
    fn monthly_breakdown(trades: &[Trade]) -> Vec<MonthlyPnl> {
        let mut monthly: HashMap<(i32, u32), Vec<&Trade>> = HashMap::new();

        for trade in trades {
            let key = (trade.date().year(), trade.date().month());
            monthly.entry(key).or_default().push(trade);
        }

        let mut months: Vec<_> = monthly
            .into_iter()
            .map(|((year, month), trades)| {
                let winners = trades.iter().filter(|t| t.is_winner()).count();
                MonthlyPnl {
                    year,
                    month,
                    pnl: trades.iter().map(|t| t.pnl()).sum(),
                    trades: trades.len(),
                    win_rate: winners as f64 / trades.len() as f64 * 100.0,
                }
            })
            .collect();

        months.sort_by_key(|m| (m.year, m.month));
        months
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.try_into().unwrap_or(0.0)
}

fn cumulative_pnl(pnls: &[f64]) -> Vec<f64> {
    pnls.iter()
        .scan(0.0, |acc, p| {
            *acc += p;
            Some(*acc)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn trades_with_pnl(pnls: &[Decimal]) -> Vec<Trade> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        pnls.iter()
            .enumerate()
            .map(|(i, pnl)| {
                let date = start + chrono::Duration::days(i as i64 * 10);
                Trade::new(date, dec!(1000), dec!(1000) + pnl, 1, 1)
            })
            .collect()
    }

    #[test]
    fn test_empty_sequence() {
        let result = PerformanceAnalyzer::analyze(vec![]);
        assert_eq!(result.total_trades, 0);
        assert_eq!(result.win_rate, 0.0);
        assert_eq!(result.total_pnl, Decimal::ZERO);
        assert_eq!(result.sharpe_ratio, 0.0);
        assert_eq!(result.max_drawdown_pct, 0.0);
        assert_eq!(result.avg_win, Decimal::ZERO);
        assert_eq!(result.avg_loss, Decimal::ZERO);
        assert_eq!(result.profit_factor, Extent::Bounded(0.0));
        assert!(result.monthly.is_empty());
    }

    #[test]
    fn test_mixed_sequence() {
        let result = PerformanceAnalyzer::analyze(trades_with_pnl(&[
            dec!(100),
            dec!(-50),
            dec!(200),
            dec!(-50),
        ]));

        assert_eq!(result.total_trades, 4);
        assert_eq!(result.win_rate, 50.0);
        assert_eq!(result.total_pnl, dec!(200));
        assert_eq!(result.avg_win, dec!(150));
        assert_eq!(result.avg_loss, dec!(-50));
        assert_eq!(result.largest_win, dec!(200));
        assert_eq!(result.largest_loss, dec!(-50));
        assert_eq!(result.profit_factor, Extent::Bounded(3.0));

        // mean 50, population std dev sqrt(11250)
        let expected = 50.0 / 11250.0_f64.sqrt() * 252.0_f64.sqrt();
        assert_relative_eq!(result.sharpe_ratio, expected, epsilon = 1e-9);

        // cumulative 100, 50, 250, 200
        assert_relative_eq!(result.max_drawdown_pct, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_pnl_counts_as_loss() {
        let result = PerformanceAnalyzer::analyze(trades_with_pnl(&[dec!(100), dec!(0)]));
        assert_eq!(result.losing_trades, 1);
        assert_eq!(result.avg_loss, Decimal::ZERO);
        assert_eq!(result.win_rate, 50.0);
        assert_eq!(result.profit_factor, Extent::Unlimited);
    }

    #[test]
    fn test_max_drawdown_series() {
        let dd = PerformanceAnalyzer::max_drawdown_pct(&[100.0, 150.0, 50.0, 120.0]);
        assert_relative_eq!(dd, 100.0 / 150.0 * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_drawdown_before_positive_peak_is_zero() {
        assert_eq!(PerformanceAnalyzer::max_drawdown_pct(&[-10.0, -50.0, -20.0]), 0.0);
        assert_eq!(PerformanceAnalyzer::max_drawdown_pct(&[]), 0.0);
    }

    #[test]
    fn test_zero_variance_sharpe() {
        assert_eq!(PerformanceAnalyzer::sharpe_ratio(&[25.0, 25.0, 25.0]), 0.0);
        assert_eq!(PerformanceAnalyzer::sharpe_ratio(&[40.0]), 0.0);
        assert_eq!(PerformanceAnalyzer::sharpe_ratio(&[]), 0.0);
    }

    #[test]
    fn test_monthly_breakdown() {
        // one trade every 10 days from Jan 1
        let trades = trades_with_pnl(&[dec!(100), dec!(-50), dec!(200), dec!(-50), dec!(30)]);
        let months = PerformanceAnalyzer::analyze(trades).monthly;

        assert_eq!(months.len(), 2);
        assert_eq!((months[0].year, months[0].month), (2024, 1));
        assert_eq!(months[0].pnl, dec!(200)); // Jan 1, 11, 21, 31
        assert_eq!(months[0].trades, 4);
        assert_eq!(months[1].month, 2);
        assert_eq!(months[1].pnl, dec!(30));
        assert_eq!(months[1].win_rate, 100.0);
    }

    #[test]
    fn test_summary_mentions_key_metrics() {
        let result = PerformanceAnalyzer::analyze(trades_with_pnl(&[dec!(100), dec!(-40)]));
        let summary = result.summary();
        assert!(summary.contains("Win Rate: 50.0%"));
        assert!(summary.contains("Trades: 2 (W: 1, L: 1)"));
        assert!(summary.contains("2024-01:"));
    }
}
