//! JSON seed loading for the operator CLI.
//!
//! The CLI has no persistent backend (a real store is a Non-goal), so every
//! invocation starts from an empty [`InMemoryStore`] and optionally
//! populates it from a small JSON description of items and batches before
//! running the requested operation.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use warehouse_core::{Batch, Item, ItemId, Money, Quantity};
use warehouse_store::{BatchRepository, InMemoryStore, ItemRepository};

#[derive(Debug, Deserialize)]
pub struct SeedItem {
    pub sku: String,
    pub name: String,
    #[serde(default = "default_supplier")]
    pub supplier: String,
    #[serde(default = "default_unit")]
    pub unit_of_measure: String,
    pub cost_price: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub reorder_point: Decimal,
    #[serde(default)]
    pub min_stock: Decimal,
    #[serde(default = "default_max_stock")]
    pub max_stock: Decimal,
}

fn default_supplier() -> String {
    "unspecified".to_string()
}
fn default_unit() -> String {
    "L".to_string()
}
fn default_currency() -> String {
    "ILS".to_string()
}
fn default_max_stock() -> Decimal {
    Decimal::from(1_000_000)
}

#[derive(Debug, Deserialize)]
pub struct SeedBatch {
    pub item_sku: String,
    pub batch_number: String,
    pub quantity_received: Decimal,
    pub receipt_date: chrono::NaiveDate,
    pub expiration_date: chrono::NaiveDate,
}

#[derive(Debug, Deserialize, Default)]
pub struct Seed {
    #[serde(default)]
    pub items: Vec<SeedItem>,
    #[serde(default)]
    pub batches: Vec<SeedBatch>,
}

impl Seed {
    pub fn from_path(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse seed file: {}", path.display()))
    }

    /// A small built-in demo dataset used when no `--seed` file is given,
    /// shaped after the ink-warehouse scenarios: one item with a near-
    /// expired batch (to trip the expiring-batch check) and one already
    /// below its reorder point.
    pub fn demo() -> Self {
        Seed {
            items: vec![SeedItem {
                sku: "INK-BLK-001".to_string(),
                name: "Black Pigment Ink".to_string(),
                supplier: "Acme Inks".to_string(),
                unit_of_measure: "L".to_string(),
                cost_price: Decimal::new(1250, 2),
                currency: "ILS".to_string(),
                reorder_point: Decimal::from(50),
                min_stock: Decimal::from(20),
                max_stock: Decimal::from(2000),
            }],
            batches: vec![SeedBatch {
                item_sku: "INK-BLK-001".to_string(),
                batch_number: "GR-DEMO-001".to_string(),
                quantity_received: Decimal::from(18),
                receipt_date: chrono::Utc::now().date_naive() - chrono::Duration::days(60),
                expiration_date: chrono::Utc::now().date_naive() + chrono::Duration::days(15),
            }],
        }
    }

    pub fn load_into(self, store: &InMemoryStore) -> Result<HashMap<String, ItemId>> {
        let mut skus = HashMap::new();
        for seed_item in self.items {
            let item = Item::new(
                seed_item.sku.clone(),
                seed_item.name,
                seed_item.supplier,
                seed_item.unit_of_measure,
                Money::new(seed_item.cost_price),
                seed_item.currency,
                Quantity::new(seed_item.reorder_point),
                Quantity::new(seed_item.min_stock),
                Quantity::new(seed_item.max_stock),
            );
            skus.insert(seed_item.sku, item.id);
            ItemRepository::create(store, item)?;
        }

        for seed_batch in self.batches {
            let item_id = *skus
                .get(&seed_batch.item_sku)
                .with_context(|| format!("seed batch references unknown item sku {:?}", seed_batch.item_sku))?;
            let batch = Batch::new(
                item_id,
                seed_batch.batch_number,
                Quantity::new(seed_batch.quantity_received),
                seed_batch.receipt_date,
                seed_batch.expiration_date,
                None,
                None,
                None,
            );
            BatchRepository::create(store, batch)?;
        }

        Ok(skus)
    }
}
