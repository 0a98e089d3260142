// warehouse-fefo - Component B: the FEFO picking engine
//
// Plans and validates outbound picks. This crate never mutates state — it
// only reads batches and produces suggestions/validations; writes flow
// through `warehouse_ledger::record_movement`.

use serde::{Deserialize, Serialize};
use tracing::instrument;
use warehouse_core::{
    Batch, BatchId, BatchStatus, Clock, Error, Item, ItemId, Money, Quantity, Result,
};
use warehouse_store::{BatchRepository, ItemRepository, LocationRepository, Store};

/// The five-bucket classification of "how urgently must this batch move".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningLevel {
    Expired,
    Critical,
    Warning,
    Caution,
    Safe,
}

impl WarningLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningLevel::Expired => "expired",
            WarningLevel::Critical => "critical",
            WarningLevel::Warning => "warning",
            WarningLevel::Caution => "caution",
            WarningLevel::Safe => "safe",
        }
    }

    pub const ALL: [WarningLevel; 5] = [
        WarningLevel::Expired,
        WarningLevel::Critical,
        WarningLevel::Warning,
        WarningLevel::Caution,
        WarningLevel::Safe,
    ];
}

impl std::fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a signed day count per spec §4.B's table.
pub fn classify(days_until_expiration: i64) -> WarningLevel {
    match days_until_expiration {
        d if d <= 0 => WarningLevel::Expired,
        1..=30 => WarningLevel::Critical,
        31..=60 => WarningLevel::Warning,
        61..=90 => WarningLevel::Caution,
        _ => WarningLevel::Safe,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub batch_id: BatchId,
    pub batch_number: String,
    pub available_quantity: Quantity,
    pub expiration_date: chrono::NaiveDate,
    pub days_until_expiration: i64,
    pub location_code: Option<String>,
    pub suggested_quantity: Quantity,
    pub warning_level: WarningLevel,
}

/// `suggest` contract (spec §4.B): walks ACTIVE, non-expired, available
/// batches of `item_id` in expiration order, allocating greedily until
/// `quantity_needed` is exhausted or the batch list runs out. Does not
/// itself gate on total availability — callers are expected to call
/// `summary` first if they need to know up front whether enough stock
/// exists.
#[instrument(skip(store, clock))]
pub fn suggest(
    store: &dyn Store,
    clock: &dyn Clock,
    item_id: ItemId,
    quantity_needed: Quantity,
) -> Result<Vec<Suggestion>> {
    let today = clock.today();
    let mut candidates: Vec<Batch> = BatchRepository::list_by_item(store, item_id)?
        .into_iter()
        .filter(|b| b.is_pickable(today))
        .collect();
    candidates.sort_by(fefo_order);

    let mut remaining = quantity_needed;
    let mut suggestions = Vec::new();

    for batch in candidates {
        if !remaining.is_positive() {
            break;
        }
        let allocated = batch.quantity_available.min(remaining);
        remaining = remaining - allocated;

        let days = batch.days_until_expiration(today);
        let location_code = match batch.location_id {
            Some(location_id) => LocationRepository::get(store, location_id)
                .ok()
                .map(|l| l.location_code()),
            None => None,
        };

        suggestions.push(Suggestion {
            batch_id: batch.id,
            batch_number: batch.batch_number.clone(),
            available_quantity: batch.quantity_available,
            expiration_date: batch.expiration_date,
            days_until_expiration: days,
            location_code,
            suggested_quantity: allocated,
            warning_level: classify(days),
        });
    }

    Ok(suggestions)
}

/// Primary key `expiration_date ASC`; ties break on `receipt_date ASC`,
/// then on batch id for a fully stable order.
fn fefo_order(a: &Batch, b: &Batch) -> std::cmp::Ordering {
    a.expiration_date
        .cmp(&b.expiration_date)
        .then(a.receipt_date.cmp(&b.receipt_date))
        .then(a.id.as_uuid().cmp(&b.id.as_uuid()))
}

/// Total pickable quantity across a item's candidate batches — the gate
/// callers are expected to check before trusting `suggest`'s output to
/// cover the full request.
#[instrument(skip(store, clock))]
pub fn total_available(store: &dyn Store, clock: &dyn Clock, item_id: ItemId) -> Result<Quantity> {
    let today = clock.today();
    Ok(BatchRepository::list_by_item(store, item_id)?
        .into_iter()
        .filter(|b| b.is_pickable(today))
        .map(|b| b.quantity_available)
        .sum())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub message: String,
    /// Structured status, so callers never have to parse `message` to find
    /// out why a batch was rejected (spec §9's warning, resolved in favor
    /// of a typed field per the Open Question decision).
    pub status: Option<BatchStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Validation {
    pub ok: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<String>,
}

impl Validation {
    fn hard_error(message: impl Into<String>, status: Option<BatchStatus>) -> Self {
        Validation {
            ok: false,
            errors: vec![ValidationIssue {
                message: message.into(),
                status,
            }],
            warnings: Vec::new(),
        }
    }
}

/// `validate` contract (spec §4.B): hard errors for missing/non-active/
/// expired/over-requested batches; advisory warnings for FEFO deviation
/// and approaching-expiration windows. FEFO deviation is never a hard
/// error — operational reality sometimes requires picking out of order.
#[instrument(skip(store, clock))]
pub fn validate(
    store: &dyn Store,
    clock: &dyn Clock,
    batch_id: BatchId,
    quantity: Quantity,
) -> Result<Validation> {
    let batch = match BatchRepository::get(store, batch_id) {
        Ok(batch) => batch,
        Err(Error::NotFound { .. }) => {
            return Ok(Validation::hard_error("batch not found", None));
        }
        Err(e) => return Err(e),
    };

    let today = clock.today();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if batch.status != BatchStatus::Active {
        errors.push(ValidationIssue {
            message: format!("batch status is {} (must be ACTIVE to pick)", batch.status),
            status: Some(batch.status),
        });
    }
    if batch.is_expired(today) {
        errors.push(ValidationIssue {
            message: format!("batch expired on {}", batch.expiration_date),
            status: Some(batch.status),
        });
    }
    if quantity > batch.quantity_available {
        errors.push(ValidationIssue {
            message: format!(
                "requested quantity {} exceeds available {}",
                quantity, batch.quantity_available
            ),
            status: None,
        });
    }

    if let Some(earlier) = earliest_deviating_batch(store, &batch)? {
        warnings.push(format!(
            "FEFO deviation: batch {} of this item expires earlier ({}) and is still ACTIVE",
            earlier.batch_number, earlier.expiration_date
        ));
    }

    let days = batch.days_until_expiration(today);
    let level = classify(days);
    if matches!(level, WarningLevel::Critical | WarningLevel::Warning) {
        warnings.push(format!(
            "batch is in the {level} window ({days} days until expiration)"
        ));
    }

    Ok(Validation {
        ok: errors.is_empty(),
        errors,
        warnings,
    })
}

/// The earliest-expiring ACTIVE, available batch of the same item that
/// expires before `batch` — present only when picking `batch` instead
/// constitutes a FEFO deviation.
fn earliest_deviating_batch(store: &dyn Store, batch: &Batch) -> Result<Option<Batch>> {
    let mut candidates: Vec<Batch> = BatchRepository::list_by_item(store, batch.item_id)?
        .into_iter()
        .filter(|b| {
            b.id != batch.id
                && b.status == BatchStatus::Active
                && b.quantity_available.is_positive()
                && b.expiration_date < batch.expiration_date
        })
        .collect();
    candidates.sort_by(fefo_order);
    Ok(candidates.into_iter().next())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LevelBucket {
    pub quantity: Quantity,
    pub batches: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_quantity: Quantity,
    pub total_batches: u32,
    pub per_level: std::collections::BTreeMap<String, LevelBucket>,
}

/// `summary` contract (spec §4.B): partitions an item's ACTIVE batches
/// (including already-expired-but-not-yet-scrapped ones) across the five
/// warning levels.
#[instrument(skip(store, clock))]
pub fn summary(store: &dyn Store, clock: &dyn Clock, item_id: ItemId) -> Result<Summary> {
    let today = clock.today();
    let batches: Vec<Batch> = BatchRepository::list_by_item(store, item_id)?
        .into_iter()
        .filter(|b| b.status == BatchStatus::Active)
        .collect();

    let mut per_level = std::collections::BTreeMap::new();
    for level in WarningLevel::ALL {
        per_level.insert(level.as_str().to_string(), LevelBucket::default());
    }

    let mut total_quantity = Quantity::zero();
    for batch in &batches {
        let level = classify(batch.days_until_expiration(today));
        let bucket = per_level.entry(level.as_str().to_string()).or_default();
        bucket.quantity = bucket.quantity + batch.quantity_available;
        bucket.batches += 1;
        total_quantity = total_quantity + batch.quantity_available;
    }

    Ok(Summary {
        total_quantity,
        total_batches: batches.len() as u32,
        per_level,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    pub total_quantity: Quantity,
    pub total_value: Money,
    pub below_reorder_point: bool,
    pub total_batches: u32,
    pub per_level: std::collections::BTreeMap<String, LevelBucket>,
}

/// Supplemented read path (SPEC_FULL §2, grounded in
/// `inventory_service.get_item_stock_summary`): a thin dashboard-oriented
/// wrapper over `summary()` plus the item's cost price and reorder point.
#[instrument(skip(store, clock))]
pub fn stock_summary(store: &dyn Store, clock: &dyn Clock, item_id: ItemId) -> Result<StockSummary> {
    let item: Item = ItemRepository::get(store, item_id)?;
    let inner = summary(store, clock, item_id)?;
    let total_value = warehouse_ledger::line_value(inner.total_quantity, item.cost_price);
    Ok(StockSummary {
        total_quantity: inner.total_quantity,
        total_value,
        below_reorder_point: inner.total_quantity < item.reorder_point,
        total_batches: inner.total_batches,
        per_level: inner.per_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use warehouse_core::FixedClock;
    use warehouse_store::InMemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn batch(item_id: ItemId, number: &str, qty: &str, receipt: NaiveDate, expiration: NaiveDate) -> Batch {
        Batch::new(
            item_id,
            number,
            Quantity::new(qty.parse().unwrap()),
            receipt,
            expiration,
            None,
            None,
            None,
        )
    }

    /// Scenario S1: FEFO basic.
    #[test]
    fn suggest_allocates_earliest_expiring_batch_first() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 5));
        let item_id = ItemId::new();

        let a = batch(item_id, "GR-260305-001", "100", date(2026, 3, 1), date(2026, 3, 25));
        let b = batch(item_id, "GR-260305-002", "150", date(2026, 3, 1), date(2026, 6, 3));
        BatchRepository::create(&store, a.clone()).unwrap();
        BatchRepository::create(&store, b.clone()).unwrap();

        let picks = suggest(&store, &clock, item_id, Quantity::new(dec!(50))).unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].batch_id, a.id);
        assert_eq!(picks[0].suggested_quantity, Quantity::new(dec!(50)));

        let picks = suggest(&store, &clock, item_id, Quantity::new(dec!(200))).unwrap();
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].batch_id, a.id);
        assert_eq!(picks[0].suggested_quantity, Quantity::new(dec!(100)));
        assert_eq!(picks[1].batch_id, b.id);
        assert_eq!(picks[1].suggested_quantity, Quantity::new(dec!(100)));
    }

    /// Scenario S4: FEFO deviation warning.
    #[test]
    fn validate_warns_on_fefo_deviation_but_still_ok() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 5));
        let item_id = ItemId::new();

        let a = batch(item_id, "GR-260305-001", "50", date(2026, 3, 1), date(2026, 3, 25));
        let b = batch(item_id, "GR-260305-002", "50", date(2026, 3, 1), date(2026, 6, 3));
        BatchRepository::create(&store, a.clone()).unwrap();
        BatchRepository::create(&store, b.clone()).unwrap();

        let validation = validate(&store, &clock, b.id, Quantity::new(dec!(30))).unwrap();
        assert!(validation.ok);
        assert!(validation.warnings.iter().any(|w| w.contains(&a.batch_number)));
    }

    #[test]
    fn validate_rejects_over_request_and_expired_batch() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 5));
        let item_id = ItemId::new();
        let b = batch(item_id, "GR-260101-001", "10", date(2026, 1, 1), date(2026, 1, 2));
        BatchRepository::create(&store, b.clone()).unwrap();

        let validation = validate(&store, &clock, b.id, Quantity::new(dec!(5))).unwrap();
        assert!(!validation.ok);
        assert!(validation.errors.iter().any(|e| e.message.contains("expired")));

        let validation = validate(&store, &clock, b.id, Quantity::new(dec!(500))).unwrap();
        assert!(!validation.ok);
        assert!(validation.errors.iter().any(|e| e.message.contains("exceeds available")));
    }

    #[test]
    fn summary_partitions_by_warning_level() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 5));
        let item_id = ItemId::new();

        BatchRepository::create(
            &store,
            batch(item_id, "GR-260305-001", "10", date(2026, 3, 1), date(2026, 3, 10)),
        )
        .unwrap();
        BatchRepository::create(
            &store,
            batch(item_id, "GR-260305-002", "20", date(2026, 3, 1), date(2026, 9, 1)),
        )
        .unwrap();

        let s = summary(&store, &clock, item_id).unwrap();
        assert_eq!(s.total_batches, 2);
        assert_eq!(s.total_quantity, Quantity::new(dec!(30)));
        assert_eq!(s.per_level["critical"].batches, 1);
        assert_eq!(s.per_level["safe"].batches, 1);
    }
}
