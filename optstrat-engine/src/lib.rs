pub mod backtest;
pub mod error;
pub mod metrics;
pub mod payoff;
pub mod probability;
pub mod settings;
pub mod strategy;

// Re-export commonly used types
pub use backtest::{
    run_backtest, run_scenarios, BacktestSimulator, BatchReport, DateRange, Scenario,
    ScenarioFailure, SimulationError, SimulatorConfig, Timeframe, Trade,
};
pub use error::{ConfigurationError, DegenerateInputError, EngineError, EngineResult};
pub use metrics::{BacktestResult, PerformanceAnalyzer};
pub use payoff::{compute_payoff, Extent, PayoffConfig, PayoffEngine, PayoffResult};
pub use probability::{estimate_profit_probability, ProbabilityConfig, ProbabilityEstimator};
pub use settings::{EngineSettings, SettingsError};
pub use strategy::{Leg, OptionType, Side, StrategyConfig, StrategyKind};
