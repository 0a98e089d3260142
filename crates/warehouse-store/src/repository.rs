//! Repository traits: the persistence seam every service crate depends on
//! instead of a concrete store. A real Postgres-backed implementation
//! (sqlx, migrations, connection pooling) would implement these same
//! traits — that layer is explicitly out of scope here (spec §1), but the
//! seam is what it would slot into.

use chrono::NaiveDate;
use warehouse_core::{
    Alert, AlertSeverity, AlertType, Batch, BatchId, Customer, CustomerId, DeliveryNote,
    DeliveryNoteId, Error, Item, ItemId, Location, LocationId, Movement, MovementId, MovementType,
    Result,
};

pub trait ItemRepository: Send + Sync {
    fn create(&self, item: Item) -> Result<Item>;
    fn get(&self, id: ItemId) -> Result<Item>;
    fn find_by_sku(&self, sku: &str) -> Result<Option<Item>>;
    fn update(&self, item: Item) -> Result<Item>;
    /// RESTRICT semantics: fails with `Error::Conflict` if any batch still
    /// references this item.
    fn delete(&self, id: ItemId) -> Result<()>;
    fn list(&self) -> Result<Vec<Item>>;
}

pub trait LocationRepository: Send + Sync {
    fn create(&self, location: Location) -> Result<Location>;
    fn get(&self, id: LocationId) -> Result<Location>;
    fn list(&self) -> Result<Vec<Location>>;
}

pub trait BatchRepository: Send + Sync {
    fn create(&self, batch: Batch) -> Result<Batch>;
    fn get(&self, id: BatchId) -> Result<Batch>;
    fn find_by_number(&self, number: &str) -> Result<Option<Batch>>;
    fn list_by_item(&self, item_id: ItemId) -> Result<Vec<Batch>>;
    fn list_all(&self) -> Result<Vec<Batch>>;
    /// Overwrites a batch row outside of a ledger movement (e.g. the alert
    /// generator's expiry scrap, or a location reassignment). Ledger-driven
    /// mutations go through `LedgerRepository::record_movement` instead, so
    /// the batch update and movement append stay atomic together.
    fn save(&self, batch: Batch) -> Result<Batch>;
}

#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    pub batch_id: Option<BatchId>,
    pub item_id: Option<ItemId>,
    pub movement_type: Option<MovementType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: usize,
}

pub trait MovementRepository: Send + Sync {
    fn list_for_batch(&self, batch_id: BatchId) -> Result<Vec<Movement>>;
    fn history(&self, filter: &MovementFilter) -> Result<Vec<Movement>>;
    fn get(&self, id: MovementId) -> Result<Movement>;
    /// The most recent movement across any of the given batches, or `None`
    /// if none of them has ever moved.
    fn last_for_batches(&self, batch_ids: &[BatchId]) -> Result<Option<Movement>>;
}

/// The combined batch-update-plus-movement-append operation the Ledger
/// relies on for atomicity. The in-memory implementation holds one lock
/// across both writes; a DB-backed implementation would wrap both in one
/// transaction after a `SELECT ... FOR UPDATE` on the batch row.
pub trait LedgerRepository: Send + Sync {
    fn record_movement(
        &self,
        batch_id: BatchId,
        compute: &mut dyn FnMut(&Batch) -> Result<(Batch, Movement)>,
    ) -> Result<(Batch, Movement)>;
}

pub trait CustomerRepository: Send + Sync {
    fn create(&self, customer: Customer) -> Result<Customer>;
    fn get(&self, id: CustomerId) -> Result<Customer>;
    fn list(&self) -> Result<Vec<Customer>>;
}

pub trait DeliveryNoteRepository: Send + Sync {
    fn create(&self, dn: DeliveryNote) -> Result<DeliveryNote>;
    fn get(&self, id: DeliveryNoteId) -> Result<DeliveryNote>;
    fn find_by_number(&self, number: &str) -> Result<Option<DeliveryNote>>;
    fn save(&self, dn: DeliveryNote) -> Result<DeliveryNote>;
    fn list(&self) -> Result<Vec<DeliveryNote>>;
}

pub trait AlertRepository: Send + Sync {
    fn create(&self, alert: Alert) -> Result<Alert>;
    fn list(&self) -> Result<Vec<Alert>>;
    /// Dedup lookup keyed per spec §4.D: `(alert_type, item_id?, batch_id?,
    /// severity?, date_bucket)`. `bucket_start`/`bucket_end` are inclusive,
    /// letting the caller express either a single calendar day or a rolling
    /// window (the dead-stock check's "last 7 days"). `severity` is `Some`
    /// only for the expiring-batches check, whose dedup key is explicitly
    /// `(batch, severity)` per spec §4.D: the same batch legitimately gets
    /// one alert per distinct severity band it crosses. The other checks
    /// have exactly one severity per alert type, so they pass `None` and
    /// dedup on `(alert_type, item)` alone.
    fn exists_in_bucket(
        &self,
        alert_type: AlertType,
        item_id: Option<ItemId>,
        batch_id: Option<BatchId>,
        severity: Option<AlertSeverity>,
        bucket_start: NaiveDate,
        bucket_end: NaiveDate,
    ) -> Result<bool>;
}

/// Generates deterministic, prefix-scoped, per-day sequence numbers. See
/// `warehouse-receiving::numbering` for the retry-on-conflict wrapper built
/// on top of this trait.
pub trait NumberSequenceStore: Send + Sync {
    /// Returns the next `{prefix}-{YYMMDD}-{counter:0width}` number for
    /// `date`, atomically reserving the counter value so a concurrent call
    /// cannot observe the same one.
    fn next(&self, prefix: &str, date: NaiveDate, width: usize) -> Result<String>;
}

/// Surfaced so callers constructing store-backed errors (the crate does
/// not otherwise re-export `warehouse_core::Error` constructors) get a
/// consistent `NotFound` shape.
pub(crate) fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Error {
    Error::not_found(entity, id)
}
