//! Payoff analysis.
//!
//! Evaluates any leg combination on a price grid and derives:
//! - Max profit / max loss (with unlimited detection)
//! - Breakeven prices
//! - Margin, risk/reward and return on margin

pub mod engine;
pub mod result;

pub use engine::{compute_payoff, PayoffConfig, PayoffEngine, MIN_GRID_POINTS};
pub use result::{Extent, PayoffPoint, PayoffResult};
