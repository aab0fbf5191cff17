//! Settle Up command-line front end
//!
//! Replays a scenario file into a splitting session, runs the debt
//! optimizer and prints the result.

mod render;
mod scenario;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use settle_core::{
    graph::{self, Theme},
    Config, Expense, NetBalances, OptimizationReport, Participant, RawDebt, SplitSession,
};
use std::path::PathBuf;

/// Split shared expenses and settle them with as few payments as possible
#[derive(Debug, Parser)]
#[command(name = "settle", version, about)]
struct Cli {
    /// Scenario file (TOML) with participants and expenses
    scenario: PathBuf,

    /// Configuration file (TOML); `SETTLE_*` environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write the settlement graph as SVG to this file
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Graph colour theme
    #[arg(long, value_enum, default_value_t = ThemeArg::Light)]
    theme: ThemeArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

/// Everything the session knows, for JSON output
#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    participants: &'a [Participant],
    expenses: &'a [Expense],
    balances: &'a NetBalances,
    raw_debts: &'a [RawDebt],
    optimized: Option<&'a OptimizationReport>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;

    let scenario = scenario::Scenario::from_file(&cli.scenario)?;
    let mut session = SplitSession::new(config.optimizer.build()?);
    scenario.apply(&mut session)?;

    match session.run_optimizer() {
        Ok(_) => {}
        // Nothing to optimize yet; still print what the scenario recorded
        Err(e) if e.is_validation() => tracing::warn!("{}", e),
        Err(e) => return Err(e.into()),
    }

    match cli.format {
        Format::Text => print!("{}", render::render_text(&session, &config.display.currency_symbol)),
        Format::Json => {
            let snapshot = Snapshot {
                participants: session.participants(),
                expenses: session.expenses(),
                balances: session.balances(),
                raw_debts: session.raw_debts(),
                optimized: session.optimized(),
            };
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    if let Some(path) = &cli.svg {
        let transfers = session
            .optimized()
            .map(|report| report.transfers.as_slice())
            .unwrap_or_default();
        let svg = graph::render_svg(
            session.participants(),
            transfers,
            &config.graph,
            cli.theme.into(),
            &config.display.currency_symbol,
        );

        if svg.is_empty() {
            tracing::info!("Nothing to settle, graph not written");
        } else {
            std::fs::write(path, svg)
                .with_context(|| format!("Failed to write graph to {}", path.display()))?;
            tracing::info!(path = %path.display(), "Graph written");
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            let mut config = Config::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            config.apply_env().context("Invalid SETTLE_* environment")?;
            tracing::info!(path = %path.display(), "Configuration loaded");
            Ok(config)
        }
        None => {
            let config = Config::from_env().context("Invalid SETTLE_* environment")?;
            tracing::info!("Configuration loaded from environment");
            Ok(config)
        }
    }
}
