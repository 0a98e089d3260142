// warehouse-cli - operator CLI for the perishable-ink warehouse core
//
// No HTTP/REST surface: this binary wires the service crates over a
// process-local InMemoryStore and exposes a handful of read/run commands an
// operator can script. A real persistent backend is a Non-goal of the core
// crates, so every invocation starts from an empty store, optionally
// seeded from a JSON file, per `seed::Seed`.

pub mod init;
pub mod seed;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use warehouse_alerts::{run_all_checks, AlertConfig, CheckCounts};
use warehouse_core::{Alert, Quantity, SystemClock};
use warehouse_receiving::{generate_number, DocumentKind};
use warehouse_store::{AlertRepository, InMemoryStore};

#[derive(Debug, Serialize)]
pub struct RunChecksOutput {
    pub counts: CheckCounts,
    pub alerts: Vec<Alert>,
}

/// Builds a store from `seed` (or the built-in demo dataset) and runs all
/// four alert checks once.
pub fn run_checks(seed: seed::Seed, config: &warehouse_config::RuntimeConfig) -> Result<RunChecksOutput> {
    let store = InMemoryStore::new();
    seed.load_into(&store).context("failed to load seed data")?;

    let clock = SystemClock;
    let alert_config = AlertConfig {
        thresholds: config.alert_thresholds.clone(),
        dead_stock_days: config.dead_stock_days,
    };
    let counts = run_all_checks(&store, &clock, &alert_config);
    let alerts = AlertRepository::list(&store).context("failed to list alerts after running checks")?;

    Ok(RunChecksOutput { counts, alerts })
}

/// Builds a store from `seed`, looks up `sku`, and returns a FEFO pick plan
/// for `quantity`.
pub fn suggest(seed: seed::Seed, sku: &str, quantity: Decimal) -> Result<Vec<warehouse_fefo::Suggestion>> {
    let store = InMemoryStore::new();
    let skus = seed.load_into(&store).context("failed to load seed data")?;
    let item_id = *skus
        .get(sku)
        .with_context(|| format!("seed data has no item with sku {sku:?}"))?;

    let clock = SystemClock;
    warehouse_fefo::suggest(&store, &clock, item_id, Quantity::new(quantity)).context("suggest failed")
}

/// Generates `count` sequential document numbers of `kind` against a fresh
/// in-memory sequence store, purely for previewing the numbering format an
/// operator would see on a given day.
pub fn numbering_preview(kind: DocumentKind, count: u32) -> Result<Vec<String>> {
    let store = InMemoryStore::new();
    let clock = SystemClock;
    (0..count)
        .map(|_| generate_number(&store, &clock, kind).context("numbering generation failed"))
        .collect()
}
