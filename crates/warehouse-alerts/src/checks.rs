//! The four check kinds (spec §4.D) plus `run_all_checks`.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use warehouse_core::{Alert, AlertSeverity, AlertType, BatchId, BatchStatus, Clock, Quantity, Result};
use warehouse_store::{AlertRepository, BatchRepository, ItemRepository, MovementRepository, Store};

#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Expiration thresholds in days (`[120, 90, 60, 30]` by default).
    /// Order doesn't matter here; `check_expiring_batches` sorts them
    /// narrowest-first before walking them.
    pub thresholds: Vec<i64>,
    pub dead_stock_days: i64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            thresholds: vec![120, 90, 60, 30],
            dead_stock_days: 180,
        }
    }
}

fn severity_for_band(band: i64) -> AlertSeverity {
    match band {
        30 => AlertSeverity::Critical,
        60 | 90 => AlertSeverity::Warning,
        120 => AlertSeverity::Info,
        _ => AlertSeverity::Warning,
    }
}

/// Check 1: expiring batches. Dedup key is `(batch, severity, day)` per
/// spec §4.D: the same batch can legitimately surface more than once in a
/// day as it crosses into a more urgent band (e.g. INFO at the 120-day
/// mark, then WARNING once it's within 90/60 days), but never twice for
/// the same severity. Bands are walked narrowest-first, independent of
/// the order `thresholds` is passed in, so the most urgent severity for a
/// given batch is always evaluated first.
#[instrument(skip(store, clock, thresholds))]
pub fn check_expiring_batches(store: &dyn Store, clock: &dyn Clock, thresholds: &[i64]) -> Result<u32> {
    let today = clock.today();
    let batches = BatchRepository::list_all(store)?;
    let mut created = 0u32;

    let mut bands: Vec<i64> = thresholds.to_vec();
    bands.sort_unstable();

    for band in bands {
        let cutoff = today + Duration::days(band);
        for batch in batches
            .iter()
            .filter(|b| b.status == BatchStatus::Active && b.expiration_date > today && b.expiration_date <= cutoff)
        {
            let severity = severity_for_band(band);
            let days_left = batch.days_until_expiration(today);
            let alert_type = if days_left <= 30 {
                AlertType::ExpirationCritical
            } else {
                AlertType::ExpirationWarning
            };

            let already_alerted = AlertRepository::exists_in_bucket(
                store,
                alert_type,
                Some(batch.item_id),
                Some(batch.id),
                Some(severity),
                today,
                today,
            )?;
            if already_alerted {
                continue;
            }

            let alert = Alert::new(
                alert_type,
                severity,
                Some(batch.id),
                Some(batch.item_id),
                format!("Batch {} is expiring soon", batch.batch_number),
                format!(
                    "Batch {} expires on {} ({days_left} days remaining)",
                    batch.batch_number, batch.expiration_date
                ),
                clock.now(),
            );
            AlertRepository::create(store, alert)?;
            created += 1;
        }
    }
    Ok(created)
}

/// Check 2: expired batches. Transitions each to SCRAP, appends a note,
/// and emits an EXPIRED/CRITICAL alert. No compensating Movement is
/// created — `quantity_available` is left exactly as it was (see the
/// Open Question resolution on `Batch::conserves_ledger`).
#[instrument(skip(store, clock))]
pub fn check_expired_batches(store: &dyn Store, clock: &dyn Clock) -> Result<u32> {
    let today = clock.today();
    let expired: Vec<_> = BatchRepository::list_all(store)?
        .into_iter()
        .filter(|b| b.status == BatchStatus::Active && b.is_expired(today))
        .collect();

    let mut scrapped = 0u32;
    for mut batch in expired {
        let note = format!("automatically scrapped: expired on {}", batch.expiration_date);
        batch.notes = Some(match batch.notes.take() {
            Some(existing) => format!("{existing}\n{note}"),
            None => note,
        });
        batch.status = BatchStatus::Scrap;
        batch.version += 1;
        let batch_id = batch.id;
        let item_id = batch.item_id;
        let batch_number = batch.batch_number.clone();
        BatchRepository::save(store, batch)?;

        AlertRepository::create(
            store,
            Alert::new(
                AlertType::Expired,
                AlertSeverity::Critical,
                Some(batch_id),
                Some(item_id),
                format!("Batch {batch_number} expired and was scrapped"),
                format!("Batch {batch_number} passed its expiration date and was automatically moved to SCRAP"),
                clock.now(),
            ),
        )?;
        scrapped += 1;
    }
    Ok(scrapped)
}

/// Check 3: low stock, gated on an item's total non-expired ACTIVE
/// quantity falling below `reorder_point`.
#[instrument(skip(store, clock))]
pub fn check_low_stock(store: &dyn Store, clock: &dyn Clock) -> Result<u32> {
    let today = clock.today();
    let items = ItemRepository::list(store)?;
    let mut created = 0u32;

    for item in items {
        let available: Quantity = BatchRepository::list_by_item(store, item.id)?
            .into_iter()
            .filter(|b| b.status == BatchStatus::Active && !b.is_expired(today))
            .map(|b| b.quantity_available)
            .sum();

        if available >= item.reorder_point {
            continue;
        }

        let already_alerted = AlertRepository::exists_in_bucket(
            store,
            AlertType::LowStock,
            Some(item.id),
            None,
            None,
            today,
            today,
        )?;
        if already_alerted {
            continue;
        }

        let severity = if available < item.min_stock {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };
        AlertRepository::create(
            store,
            Alert::new(
                AlertType::LowStock,
                severity,
                None,
                Some(item.id),
                format!("{} is below reorder point", item.name),
                format!(
                    "{} has {available} available against a reorder point of {}",
                    item.name, item.reorder_point
                ),
                clock.now(),
            ),
        )?;
        created += 1;
    }
    Ok(created)
}

/// Check 4: dead stock, gated on the most recent movement across an
/// item's ACTIVE batches being older than `dead_stock_days`.
#[instrument(skip(store, clock))]
pub fn check_dead_stock(store: &dyn Store, clock: &dyn Clock, dead_stock_days: i64) -> Result<u32> {
    let today = clock.today();
    let items = ItemRepository::list(store)?;
    let mut created = 0u32;

    for item in items {
        let batches = BatchRepository::list_by_item(store, item.id)?;
        let active: Vec<_> = batches.into_iter().filter(|b| b.status == BatchStatus::Active).collect();
        if active.is_empty() {
            continue;
        }
        let batch_ids: Vec<BatchId> = active.iter().map(|b| b.id).collect();

        // No movement at all means nothing to measure staleness against;
        // skip rather than treat it as dead stock.
        let Some(last_movement) = MovementRepository::last_for_batches(store, &batch_ids)? else {
            continue;
        };
        let last_activity = last_movement.timestamp.date_naive();

        if last_activity >= today - Duration::days(dead_stock_days) {
            continue;
        }

        let week_start = today - Duration::days(7);
        let already_alerted = AlertRepository::exists_in_bucket(
            store,
            AlertType::DeadStock,
            Some(item.id),
            None,
            None,
            week_start,
            today,
        )?;
        if already_alerted {
            continue;
        }

        AlertRepository::create(
            store,
            Alert::new(
                AlertType::DeadStock,
                AlertSeverity::Warning,
                None,
                Some(item.id),
                format!("{} has had no movement in over {dead_stock_days} days", item.name),
                format!("{} was last moved on {last_activity}", item.name),
                clock.now(),
            ),
        )?;
        created += 1;
    }
    Ok(created)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckCounts {
    pub expiring_alerts: u32,
    pub expired_batches: u32,
    pub low_stock_alerts: u32,
    pub dead_stock_alerts: u32,
}

impl CheckCounts {
    pub fn total_new_alerts(&self) -> u32 {
        self.expiring_alerts + self.expired_batches + self.low_stock_alerts + self.dead_stock_alerts
    }
}

/// Runs all four checks in sequence (spec §4.D's manual trigger). Each
/// check kind is its own failure domain — one failing never aborts the
/// others, it's logged and the run continues (spec §7's one named
/// exception to "the core returns errors, it does not catch-and-continue").
#[instrument(skip(store, clock, config))]
pub fn run_all_checks(store: &dyn Store, clock: &dyn Clock, config: &AlertConfig) -> CheckCounts {
    let mut counts = CheckCounts::default();

    match check_expiring_batches(store, clock, &config.thresholds) {
        Ok(n) => counts.expiring_alerts = n,
        Err(e) => tracing::error!(error = %e, "expiring-batches check failed"),
    }
    match check_expired_batches(store, clock) {
        Ok(n) => counts.expired_batches = n,
        Err(e) => tracing::error!(error = %e, "expired-batches check failed"),
    }
    match check_low_stock(store, clock) {
        Ok(n) => counts.low_stock_alerts = n,
        Err(e) => tracing::error!(error = %e, "low-stock check failed"),
    }
    match check_dead_stock(store, clock, config.dead_stock_days) {
        Ok(n) => counts.dead_stock_alerts = n,
        Err(e) => tracing::error!(error = %e, "dead-stock check failed"),
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use warehouse_core::{Batch, FixedClock, Item, ItemId, Money, MovementType, UserId};
    use warehouse_store::{BatchRepository as _, InMemoryStore};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed_item(store: &InMemoryStore, reorder: &str, min: &str) -> ItemId {
        let item = Item::new(
            "SKU-1",
            "Black Ink",
            "Acme",
            "L",
            Money::new(dec!(5.00)),
            "ILS",
            Quantity::new(reorder.parse().unwrap()),
            Quantity::new(min.parse().unwrap()),
            Quantity::new(dec!(1000)),
        );
        let id = item.id;
        ItemRepository::create(store, item).unwrap();
        id
    }

    /// Scenario S3: expired-batch auto-scrap.
    #[test]
    fn expired_batches_are_scrapped_with_unchanged_quantity() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 5));
        let item_id = ItemId::new();
        let batch = Batch::new(
            item_id,
            "GR-260101-001",
            Quantity::new(dec!(40)),
            date(2026, 1, 1),
            date(2026, 3, 4),
            None,
            None,
            None,
        );
        let batch_id = batch.id;
        BatchRepository::create(&store, batch).unwrap();

        let count = check_expired_batches(&store, &clock).unwrap();
        assert_eq!(count, 1);

        let updated = BatchRepository::get(&store, batch_id).unwrap();
        assert_eq!(updated.status, BatchStatus::Scrap);
        assert_eq!(updated.quantity_available, Quantity::new(dec!(40)));
        assert!(updated.notes.as_ref().unwrap().contains("automatically scrapped"));

        let alerts = AlertRepository::list(&store).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, AlertType::Expired);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);

        // Running again same day creates no new alert (already SCRAP, not ACTIVE).
        let count = check_expired_batches(&store, &clock).unwrap();
        assert_eq!(count, 0);
    }

    /// Scenario S7: low-stock threshold.
    #[test]
    fn low_stock_severity_escalates_below_min_stock() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 5));
        let item_id = seed_item(&store, "50", "20");
        let batch = Batch::new(
            item_id,
            "GR-260101-001",
            Quantity::new(dec!(15)),
            date(2026, 1, 1),
            date(2026, 12, 1),
            None,
            None,
            None,
        );
        BatchRepository::create(&store, batch).unwrap();

        let count = check_low_stock(&store, &clock).unwrap();
        assert_eq!(count, 1);
        let alerts = AlertRepository::list(&store).unwrap();
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);

        // Second run same day: no new alert.
        assert_eq!(check_low_stock(&store, &clock).unwrap(), 0);
    }

    #[test]
    fn dead_stock_uses_last_movement_not_receipt_date() {
        let store = InMemoryStore::new();
        let item_id = ItemId::new();
        let receipt_clock = FixedClock::at_date(date(2026, 1, 1));
        let batch = Batch::new(
            item_id,
            "GR-260101-001",
            Quantity::new(dec!(100)),
            date(2026, 1, 1),
            date(2027, 1, 1),
            None,
            None,
            None,
        );
        let batch_id = batch.id;
        BatchRepository::create(&store, batch).unwrap();
        stamp_last_activity(&store, &receipt_clock, batch_id);

        let later_clock = FixedClock::at_date(date(2026, 7, 1));
        let count = check_dead_stock(&store, &later_clock, 180).unwrap();
        assert_eq!(count, 1);
    }

    /// Stamps a zero-quantity movement on the batch so `last_for_batches`
    /// has a timestamp to measure dead-stock staleness against, without
    /// altering `quantity_available`.
    fn stamp_last_activity(store: &InMemoryStore, clock: &FixedClock, batch_id: BatchId) {
        use warehouse_store::LedgerRepository;
        store
            .record_movement(batch_id, &mut |current| {
                let next = current.clone();
                Ok((
                    next,
                    warehouse_core::Movement {
                        id: warehouse_core::MovementId::new(),
                        batch_id,
                        user_id: UserId::new(),
                        movement_type: MovementType::Receipt,
                        quantity: Quantity::zero(),
                        quantity_before: current.quantity_available,
                        quantity_after: current.quantity_available,
                        reference_number: None,
                        timestamp: clock.now(),
                        notes: None,
                    },
                ))
            })
            .unwrap();
    }
}
