//! Probability-of-profit estimation (heuristic).

pub mod estimator;

pub use estimator::{estimate_profit_probability, ProbabilityConfig, ProbabilityEstimator};
