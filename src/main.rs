use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;
use warehouse_cli::{init::init_tracing, numbering_preview, run_checks, seed::Seed, suggest};
use warehouse_receiving::DocumentKind;

/// Operator CLI for the perishable-ink warehouse core (FEFO, ledger,
/// receiving, alerts). No HTTP/REST surface — see the service crates for
/// the library API this wraps.
#[derive(Parser)]
#[command(name = "warehouse")]
#[command(version)]
#[command(about = "Operator CLI for the perishable-ink warehouse core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML configuration file (falls back to env vars and
    /// built-in defaults if omitted).
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all four alert checks once against seeded data and print what
    /// fired.
    RunChecks {
        /// JSON file describing items and batches to seed the store with.
        /// Falls back to a small built-in demo dataset if omitted.
        #[arg(long, value_name = "FILE")]
        seed: Option<PathBuf>,
    },
    /// Print a FEFO pick plan for an item against seeded data.
    Suggest {
        #[arg(long, value_name = "FILE")]
        seed: Option<PathBuf>,
        /// SKU of the item to plan a pick for.
        #[arg(long)]
        sku: String,
        /// Quantity needed.
        #[arg(long)]
        quantity: Decimal,
    },
    /// Preview the next N document numbers of a given kind, as they would
    /// appear on today's date.
    NumberingPreview {
        #[arg(long, value_enum)]
        kind: DocumentKindArg,
        #[arg(long, default_value_t = 5)]
        count: u32,
    },
    /// Load and validate the effective configuration, then print it.
    ValidateConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum DocumentKindArg {
    Batch,
    Grn,
    Dispatch,
    DeliveryNote,
}

impl From<DocumentKindArg> for DocumentKind {
    fn from(arg: DocumentKindArg) -> Self {
        match arg {
            DocumentKindArg::Batch => DocumentKind::Batch,
            DocumentKindArg::Grn => DocumentKind::Grn,
            DocumentKindArg::Dispatch => DocumentKind::Dispatch,
            DocumentKindArg::DeliveryNote => DocumentKind::DeliveryNote,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => warehouse_config::RuntimeConfig::load_from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => warehouse_config::RuntimeConfig::load().context("failed to load configuration")?,
    };

    match cli.command {
        Commands::RunChecks { seed } => {
            let seed = load_seed(seed)?;
            let output = run_checks(seed, &config)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Suggest { seed, sku, quantity } => {
            let seed = load_seed(seed)?;
            let plan = suggest(seed, &sku, quantity)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Commands::NumberingPreview { kind, count } => {
            let numbers = numbering_preview(kind.into(), count)?;
            for number in numbers {
                println!("{number}");
            }
        }
        Commands::ValidateConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn load_seed(path: Option<PathBuf>) -> Result<Seed> {
    match path {
        Some(path) => Seed::from_path(&path),
        None => Ok(Seed::demo()),
    }
}
