//! # Analyze a strategy's payoff at expiry
//! optstrat payoff --strategy config/strategies/bull-call-spread.toml
//!
//! # Backtest one strategy over a date range
//! optstrat backtest --asset NIFTY --strategy iron-condor --start 2024-01-01 --end 2024-12-31 --seed 42
//!
//! # Backtest several strategies over the trailing year, as JSON
//! optstrat backtest --asset BANKNIFTY --strategy long-call,short-straddle --timeframe 1Y --json

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use optstrat_engine::{
    run_scenarios, BatchReport, DateRange, EngineSettings, PayoffResult, Scenario, StrategyConfig,
    StrategyKind, Timeframe,
};

#[derive(Parser)]
#[command(name = "optstrat")]
#[command(about = "Options strategy payoff analytics and backtest simulation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to engine settings (TOML); built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute payoff extremes, breakevens and profit probability
    Payoff {
        /// Path to a strategy definition (TOML)
        #[arg(short, long)]
        strategy: PathBuf,
    },

    /// Simulate and analyze trade sequences
    Backtest {
        /// Underlying symbol
        #[arg(short, long, default_value = "NIFTY")]
        asset: String,

        /// Comma-separated strategy kinds (e.g. iron-condor,long-call)
        #[arg(short, long)]
        strategy: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        end: Option<String>,

        /// Trailing window (1M, 3M, 6M, 1Y, 2Y) used when --start is omitted
        #[arg(long, default_value = "1Y")]
        timeframe: String,

        /// Seed for the first scenario; later scenarios use seed + index
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Serialize)]
struct PayoffReport<'a> {
    strategy: &'a StrategyConfig,
    payoff: &'a PayoffResult,
    profit_probability_pct: f64,
}

fn load_settings(path: Option<&PathBuf>) -> Result<EngineSettings> {
    match path {
        Some(p) => EngineSettings::from_toml(p)
            .with_context(|| format!("Failed to load settings from {}", p.display())),
        None => Ok(EngineSettings::default()),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Invalid date: {}", s))
}

fn cmd_payoff(settings: &EngineSettings, path: &PathBuf, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read strategy {}", path.display()))?;
    let strategy: StrategyConfig =
        toml::from_str(&content).context("Invalid strategy definition")?;

    let payoff = settings.payoff_engine().compute(&strategy)?;
    let probability = settings.probability_estimator().estimate(&strategy)?;

    if json {
        let report = PayoffReport {
            strategy: &strategy,
            payoff: &payoff,
            profit_probability_pct: probability,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} ({} legs, spot {:.2}, {} DTE)\n",
            strategy.kind,
            strategy.legs.len(),
            strategy.spot_price,
            strategy.days_to_expiry
        );
        println!("{}", payoff.summary());
        println!("Probability of Profit: {:.1}% (heuristic)", probability);
    }

    Ok(())
}

fn cmd_backtest(
    settings: &EngineSettings,
    asset: &str,
    strategies: &str,
    range: DateRange,
    seed: u64,
    json: bool,
) -> Result<()> {
    let mut scenarios = Vec::new();
    for (i, name) in strategies.split(',').map(|s| s.trim()).enumerate() {
        let Some(kind) = StrategyKind::from_str(name) else {
            bail!("Unknown strategy: {}", name);
        };
        scenarios.push(Scenario::new(asset, kind, range, seed.wrapping_add(i as u64)));
    }

    info!(
        "Backtesting {} on {} from {} to {}",
        strategies,
        asset,
        range.start(),
        range.end()
    );

    let simulator = settings.simulator();
    let report = BatchReport::collect(&scenarios, run_scenarios(&simulator, &scenarios));

    for failure in &report.failures {
        warn!("Scenario {} failed: {}", failure.key, failure.error);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for outcome in &report.outcomes {
            println!("{}", outcome.scenario.key());
            println!("{}\n", outcome.result.summary());
        }
    }

    if !report.is_complete() {
        bail!(
            "{} of {} scenarios failed",
            report.failures.len(),
            scenarios.len()
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("optstrat_engine=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_ref())?;

    match cli.command {
        Commands::Payoff { strategy } => cmd_payoff(&settings, &strategy, cli.json)?,
        Commands::Backtest {
            asset,
            strategy,
            start,
            end,
            timeframe,
            seed,
        } => {
            let end_date = match end {
                Some(e) => parse_date(&e)?,
                None => Utc::now().date_naive(),
            };
            let range = match start {
                Some(s) => DateRange::new(parse_date(&s)?, end_date)?,
                None => {
                    let tf = Timeframe::from_str(&timeframe)
                        .with_context(|| format!("Unknown timeframe: {}", timeframe))?;
                    DateRange::trailing(end_date, tf)
                }
            };
            cmd_backtest(&settings, &asset, &strategy, range, seed, cli.json)?;
        }
    }

    Ok(())
}
