//! Parallel scenario runner.
//!
//! Scenarios share nothing mutable: each carries its own seed and gets its
//! own generator, so running them on the rayon pool yields the same results
//! as running them one by one.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::metrics::{BacktestResult, PerformanceAnalyzer};
use crate::strategy::StrategyKind;

use super::simulator::{BacktestSimulator, DateRange, SimulationResult};

/// One (asset, strategy, range, seed) backtest request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub asset: String,
    pub strategy: StrategyKind,
    pub range: DateRange,
    pub seed: u64,
}

impl Scenario {
    pub fn new(asset: &str, strategy: StrategyKind, range: DateRange, seed: u64) -> Self {
        Self {
            asset: asset.to_string(),
            strategy,
            range,
            seed,
        }
    }

    /// Create a unique key for this scenario.
    pub fn key(&self) -> String {
        format!(
            "{}_{}_{}_{}_s{}",
            self.asset,
            self.strategy,
            self.range.start(),
            self.range.end(),
            self.seed
        )
    }
}

/// Analyzed result of one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub result: BacktestResult,
}

impl BacktestSimulator {
    /// Simulate and analyze a single scenario.
    pub fn run_scenario(&self, scenario: &Scenario) -> SimulationResult<ScenarioOutcome> {
        let trades = self.run(&scenario.asset, scenario.strategy, &scenario.range, scenario.seed)?;
        Ok(ScenarioOutcome {
            scenario: scenario.clone(),
            result: PerformanceAnalyzer::analyze(trades),
        })
    }
}

/// A scenario that did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioFailure {
    pub key: String,
    pub error: String,
}

/// Completed outcomes and failures of one batch, each in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<ScenarioOutcome>,
    pub failures: Vec<ScenarioFailure>,
}

impl BatchReport {
    /// Split `run_scenarios` results for `scenarios` into outcomes and failures.
    pub fn collect(
        scenarios: &[Scenario],
        results: Vec<SimulationResult<ScenarioOutcome>>,
    ) -> Self {
        let mut report = Self::default();
        for (scenario, result) in scenarios.iter().zip(results) {
            match result {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(e) => report.failures.push(ScenarioFailure {
                    key: scenario.key(),
                    error: e.to_string(),
                }),
            }
        }
        report
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run scenarios in parallel. Results come back in input order.
pub fn run_scenarios(
    simulator: &BacktestSimulator,
    scenarios: &[Scenario],
) -> Vec<SimulationResult<ScenarioOutcome>> {
    let total = scenarios.len();
    let progress = AtomicUsize::new(0);

    info!("Running {} backtest scenarios", total);

    scenarios
        .par_iter()
        .map(|scenario| {
            let outcome = simulator.run_scenario(scenario);

            let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
            if done % (total / 10).max(1) == 0 || done == total {
                info!(
                    "  {:.0}% ({}/{} scenarios)",
                    done as f64 / total as f64 * 100.0,
                    done,
                    total
                );
            }

            outcome
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backtest::SimulationError;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let simulator = BacktestSimulator::default();
        let scenarios: Vec<_> = StrategyKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| Scenario::new("NIFTY", *kind, range(), i as u64))
            .collect();

        let parallel = run_scenarios(&simulator, &scenarios);
        assert_eq!(parallel.len(), scenarios.len());

        for (scenario, outcome) in scenarios.iter().zip(parallel) {
            let outcome = outcome.unwrap();
            assert_eq!(&outcome.scenario, scenario);
            let sequential = simulator.run_scenario(scenario).unwrap();
            assert_eq!(outcome.result, sequential.result);
        }
    }

    #[test]
    fn test_failures_are_per_scenario() {
        let simulator = BacktestSimulator::default();
        let scenarios = vec![
            Scenario::new("NIFTY", StrategyKind::IronCondor, range(), 1),
            Scenario::new("NOPE", StrategyKind::IronCondor, range(), 1),
        ];
        let results = run_scenarios(&simulator, &scenarios);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1].as_ref().unwrap_err(),
            &SimulationError::UnknownAsset("NOPE".to_string())
        );
    }

    #[test]
    fn test_batch_report_records_failures() {
        let simulator = BacktestSimulator::default();
        let scenarios = vec![
            Scenario::new("NIFTY", StrategyKind::IronCondor, range(), 1),
            Scenario::new("NOPE", StrategyKind::LongCall, range(), 2),
            Scenario::new("SENSEX", StrategyKind::LongPut, range(), 3),
        ];
        let report = BatchReport::collect(&scenarios, run_scenarios(&simulator, &scenarios));

        assert!(!report.is_complete());
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcomes[1].scenario.asset, "SENSEX");
        assert_eq!(
            report.failures,
            vec![ScenarioFailure {
                key: "NOPE_long-call_2024-01-01_2024-06-30_s2".to_string(),
                error: SimulationError::UnknownAsset("NOPE".to_string()).to_string(),
            }]
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failures"][0]["key"], "NOPE_long-call_2024-01-01_2024-06-30_s2");
    }

    #[test]
    fn test_batch_report_complete() {
        let simulator = BacktestSimulator::default();
        let scenarios = vec![Scenario::new("NIFTY", StrategyKind::LongCall, range(), 4)];
        let report = BatchReport::collect(&scenarios, run_scenarios(&simulator, &scenarios));
        assert!(report.is_complete());
        assert_eq!(report.outcomes.len(), 1);
    }

    #[test]
    fn test_scenario_key() {
        let scenario = Scenario::new("NIFTY", StrategyKind::LongCall, range(), 9);
        assert_eq!(scenario.key(), "NIFTY_long-call_2024-01-01_2024-06-30_s9");
    }
}
