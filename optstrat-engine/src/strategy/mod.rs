//! Strategy model.
//!
//! Vocabulary shared by the payoff and backtest pipelines:
//! - Option legs (type, side, strike, premium, quantity)
//! - Strategy kinds with fixed leg counts and directional bias
//! - Validated strategy configurations

pub mod config;
pub mod kind;
pub mod leg;

pub use config::{StrategyBuilder, StrategyConfig};
pub use kind::{Bias, StrategyKind};
pub use leg::{Leg, OptionType, Side};
