//! Backtest simulation for options strategies.
//!
//! This module provides:
//! - Immutable trade records
//! - Injectable return-model and asset tables
//! - A seeded, reproducible trade simulator
//! - A parallel runner for independent scenarios

pub mod batch;
pub mod simulator;
pub mod tables;
pub mod trade;

pub use batch::{run_scenarios, BatchReport, Scenario, ScenarioFailure, ScenarioOutcome};
pub use simulator::{
    run_backtest, BacktestSimulator, DateRange, SimulationError, SimulationResult,
    SimulatorConfig, Timeframe,
};
pub use tables::{AssetProfile, ReturnModel};
pub use trade::Trade;
