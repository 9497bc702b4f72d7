use approx::assert_relative_eq;
use chrono::NaiveDate;

use optstrat_engine::{
    compute_payoff, estimate_profit_probability, run_backtest, DateRange, EngineSettings, Extent,
    PerformanceAnalyzer, StrategyConfig, StrategyKind,
};

const DEFAULT_SETTINGS: &str = include_str!("../config/default.toml");
const BULL_CALL_SPREAD: &str = include_str!("../config/strategies/bull-call-spread.toml");
const IRON_CONDOR: &str = include_str!("../config/strategies/iron-condor.toml");

#[test]
fn default_settings_file_matches_builtin_defaults() {
    let from_file = EngineSettings::from_toml_str(DEFAULT_SETTINGS).unwrap();
    let builtin = EngineSettings::default();
    assert_eq!(
        serde_json::to_value(&from_file).unwrap(),
        serde_json::to_value(&builtin).unwrap()
    );
}

#[test]
fn bull_call_spread_file_payoff() {
    let strategy: StrategyConfig = toml::from_str(BULL_CALL_SPREAD).unwrap();
    let payoff = compute_payoff(&strategy).unwrap();

    assert_eq!(payoff.max_loss, Extent::Bounded(2500.0));
    assert_relative_eq!(payoff.max_profit.value().unwrap(), 2500.0, epsilon = 1e-6);
    assert_eq!(payoff.breakevens.len(), 1);
    assert_relative_eq!(payoff.breakevens[0], 25850.0, epsilon = 1e-6);

    let probability = estimate_profit_probability(&strategy).unwrap();
    assert!((0.0..=100.0).contains(&probability));
}

#[test]
fn iron_condor_file_payoff() {
    let strategy: StrategyConfig = toml::from_str(IRON_CONDOR).unwrap();
    let payoff = compute_payoff(&strategy).unwrap();

    assert_eq!(payoff.breakevens.len(), 2);
    for b in &payoff.breakevens {
        assert!(strategy.pnl_at(*b).abs() < 1e-6);
    }
    assert!(payoff.is_defined_risk());
    assert_relative_eq!(payoff.margin_required, 2350.0, epsilon = 1e-6);
}

#[test]
fn backtest_pipeline_is_reproducible() {
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
    )
    .unwrap();

    let first = run_backtest("NIFTY", StrategyKind::ShortStraddle, &range, 2024).unwrap();
    let second = run_backtest("NIFTY", StrategyKind::ShortStraddle, &range, 2024).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    let a = PerformanceAnalyzer::analyze(first);
    let b = PerformanceAnalyzer::analyze(second);
    assert_eq!(a, b);
    assert_eq!(a.total_trades, 262); // weekdays in 2024
    assert!((0.0..=100.0).contains(&a.win_rate));
    assert!(a.max_drawdown_pct >= 0.0);
    assert!(a.sharpe_ratio.is_finite());
}
