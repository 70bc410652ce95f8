//! Codebeast - Development Tools

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use codebeast_core::battle::BattleSimulator;
use codebeast_tools::{loader, report, validate, Result, ToolError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "codebeast-tools")]
#[command(about = "Development tools for the Codebeast battle engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a matchup file and print the turn log
    Simulate {
        /// Path to a matchup RON file
        path: PathBuf,
        /// Override the matchup's turn cap
        #[arg(long)]
        turn_cap: Option<u32>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate data files
    Validate {
        /// Path to data directory
        #[arg(default_value = loader::DEFAULT_DATA_DIR)]
        path: PathBuf,
    },
    /// Print each unit's resolved passives
    Describe {
        /// Path to a matchup RON file
        path: PathBuf,
    },
}

fn simulate(path: &Path, turn_cap: Option<u32>, json: bool) -> Result<()> {
    let mut matchup = loader::load_matchup(path)?;
    if let Some(cap) = turn_cap {
        matchup.config.turn_cap = cap;
    }

    let simulator = BattleSimulator::new(Arc::new(loader::engine_for(path)));
    let result = simulator.resolve_matchup(&matchup);

    if json {
        println!("{}", report::render_json(&matchup, &result)?);
    } else {
        print!("{}", report::render_turn_table(&result));
    }
    Ok(())
}

fn validate(path: &Path) -> Result<()> {
    let report = validate::validate_data_directory(path)?;
    for issue in &report.issues {
        println!("{issue}");
    }
    tracing::info!(
        files = report.files_checked,
        issues = report.issues.len(),
        "Validation finished"
    );
    if report.is_clean() {
        Ok(())
    } else {
        Err(ToolError::ValidationFailed(report.issues.len()))
    }
}

fn describe(path: &Path) -> Result<()> {
    let matchup = loader::load_matchup(path)?;
    let engine = loader::engine_for(path);
    print!("{}", report::render_descriptions(&engine, &matchup));
    Ok(())
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Simulate {
            path,
            turn_cap,
            json,
        } => {
            tracing::info!("Simulating matchup: {}", path.display());
            simulate(&path, turn_cap, json)
        }
        Commands::Validate { path } => {
            tracing::info!("Validating data files in: {}", path.display());
            validate(&path)
        }
        Commands::Describe { path } => describe(&path),
    };

    if let Err(e) = outcome {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
