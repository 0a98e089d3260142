//! A single-process, `parking_lot`-guarded reference store. Stands in for
//! a real database in every test in this workspace and in the CLI. Not
//! durable, not distributed — the Non-goal spec §1 names explicitly.

use crate::repository::{
    AlertRepository, BatchRepository, CustomerRepository, DeliveryNoteRepository,
    LedgerRepository, LocationRepository, MovementFilter, MovementRepository, NumberSequenceStore,
    ItemRepository,
};
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::collections::HashMap;
use warehouse_core::{
    Alert, AlertType, Batch, BatchId, Customer, CustomerId, DeliveryNote, DeliveryNoteId, Error,
    Item, ItemId, Location, LocationId, Movement, MovementId, MovementType, Result,
};

/// One in-memory table per aggregate, each behind its own lock. `batches`
/// and `movements` share conceptual lifetime (a movement always updates
/// exactly one batch) but are locked independently by every trait method
/// *except* `LedgerRepository::record_movement`, which takes both locks
/// for the duration of the write — the store's stand-in for the row-level
/// exclusive lock spec §4.A/§5 describe.
#[derive(Default)]
pub struct InMemoryStore {
    items: Mutex<HashMap<ItemId, Item>>,
    locations: Mutex<HashMap<LocationId, Location>>,
    batches: Mutex<HashMap<BatchId, Batch>>,
    movements: Mutex<Vec<Movement>>,
    customers: Mutex<HashMap<CustomerId, Customer>>,
    delivery_notes: Mutex<HashMap<DeliveryNoteId, DeliveryNote>>,
    alerts: Mutex<Vec<Alert>>,
    sequences: Mutex<HashMap<String, u32>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemRepository for InMemoryStore {
    fn create(&self, item: Item) -> Result<Item> {
        let mut items = self.items.lock();
        if items.values().any(|existing| existing.sku == item.sku) {
            return Err(Error::conflict(format!("sku '{}' already exists", item.sku)));
        }
        items.insert(item.id, item.clone());
        Ok(item)
    }

    fn get(&self, id: ItemId) -> Result<Item> {
        self.items
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("Item", id))
    }

    fn find_by_sku(&self, sku: &str) -> Result<Option<Item>> {
        Ok(self.items.lock().values().find(|i| i.sku == sku).cloned())
    }

    fn update(&self, item: Item) -> Result<Item> {
        let mut items = self.items.lock();
        if !items.contains_key(&item.id) {
            return Err(Error::not_found("Item", item.id));
        }
        items.insert(item.id, item.clone());
        Ok(item)
    }

    fn delete(&self, id: ItemId) -> Result<()> {
        let has_batches = self.batches.lock().values().any(|b| b.item_id == id);
        if has_batches {
            return Err(Error::conflict(
                "cannot delete an item while batches reference it",
            ));
        }
        self.items
            .lock()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("Item", id))
    }

    fn list(&self) -> Result<Vec<Item>> {
        Ok(self.items.lock().values().cloned().collect())
    }
}

impl LocationRepository for InMemoryStore {
    fn create(&self, location: Location) -> Result<Location> {
        self.locations.lock().insert(location.id, location.clone());
        Ok(location)
    }

    fn get(&self, id: LocationId) -> Result<Location> {
        self.locations
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("Location", id))
    }

    fn list(&self) -> Result<Vec<Location>> {
        Ok(self.locations.lock().values().cloned().collect())
    }
}

impl BatchRepository for InMemoryStore {
    fn create(&self, batch: Batch) -> Result<Batch> {
        let mut batches = self.batches.lock();
        if batches.values().any(|b| b.batch_number == batch.batch_number) {
            return Err(Error::conflict(format!(
                "batch_number '{}' already exists",
                batch.batch_number
            )));
        }
        batches.insert(batch.id, batch.clone());
        Ok(batch)
    }

    fn get(&self, id: BatchId) -> Result<Batch> {
        self.batches
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("Batch", id))
    }

    fn find_by_number(&self, number: &str) -> Result<Option<Batch>> {
        Ok(self
            .batches
            .lock()
            .values()
            .find(|b| b.batch_number == number)
            .cloned())
    }

    fn list_by_item(&self, item_id: ItemId) -> Result<Vec<Batch>> {
        Ok(self
            .batches
            .lock()
            .values()
            .filter(|b| b.item_id == item_id)
            .cloned()
            .collect())
    }

    fn list_all(&self) -> Result<Vec<Batch>> {
        Ok(self.batches.lock().values().cloned().collect())
    }

    fn save(&self, batch: Batch) -> Result<Batch> {
        let mut batches = self.batches.lock();
        if !batches.contains_key(&batch.id) {
            return Err(Error::not_found("Batch", batch.id));
        }
        batches.insert(batch.id, batch.clone());
        Ok(batch)
    }
}

impl MovementRepository for InMemoryStore {
    fn list_for_batch(&self, batch_id: BatchId) -> Result<Vec<Movement>> {
        Ok(self
            .movements
            .lock()
            .iter()
            .filter(|m| m.batch_id == batch_id)
            .cloned()
            .collect())
    }

    fn history(&self, filter: &MovementFilter) -> Result<Vec<Movement>> {
        let batches_by_item: HashMap<BatchId, ItemId> = self
            .batches
            .lock()
            .values()
            .map(|b| (b.id, b.item_id))
            .collect();

        let mut results: Vec<Movement> = self
            .movements
            .lock()
            .iter()
            .filter(|m| filter.batch_id.map_or(true, |id| id == m.batch_id))
            .filter(|m| {
                filter
                    .item_id
                    .map_or(true, |item_id| batches_by_item.get(&m.batch_id) == Some(&item_id))
            })
            .filter(|m| filter.movement_type.map_or(true, |t| t == m.movement_type))
            .filter(|m| {
                filter
                    .date_from
                    .map_or(true, |from| m.timestamp.date_naive() >= from)
            })
            .filter(|m| filter.date_to.map_or(true, |to| m.timestamp.date_naive() <= to))
            .cloned()
            .collect();

        results.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let limit = if filter.limit == 0 { 500 } else { filter.limit.min(500) };
        results.truncate(limit);
        Ok(results)
    }

    fn get(&self, id: MovementId) -> Result<Movement> {
        self.movements
            .lock()
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("Movement", id))
    }

    fn last_for_batches(&self, batch_ids: &[BatchId]) -> Result<Option<Movement>> {
        Ok(self
            .movements
            .lock()
            .iter()
            .filter(|m| batch_ids.contains(&m.batch_id))
            .max_by_key(|m| m.timestamp)
            .cloned())
    }
}

impl LedgerRepository for InMemoryStore {
    fn record_movement(
        &self,
        batch_id: BatchId,
        compute: &mut dyn FnMut(&Batch) -> Result<(Batch, Movement)>,
    ) -> Result<(Batch, Movement)> {
        let mut batches = self.batches.lock();
        let current = batches
            .get(&batch_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Batch", batch_id))?;
        let (updated, movement) = compute(&current)?;
        batches.insert(batch_id, updated.clone());
        self.movements.lock().push(movement.clone());
        Ok((updated, movement))
    }
}

impl CustomerRepository for InMemoryStore {
    fn create(&self, customer: Customer) -> Result<Customer> {
        self.customers.lock().insert(customer.id, customer.clone());
        Ok(customer)
    }

    fn get(&self, id: CustomerId) -> Result<Customer> {
        self.customers
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("Customer", id))
    }

    fn list(&self) -> Result<Vec<Customer>> {
        Ok(self.customers.lock().values().cloned().collect())
    }
}

impl DeliveryNoteRepository for InMemoryStore {
    fn create(&self, dn: DeliveryNote) -> Result<DeliveryNote> {
        let mut dns = self.delivery_notes.lock();
        if dns.values().any(|d| d.number == dn.number) {
            return Err(Error::conflict(format!("delivery note '{}' already exists", dn.number)));
        }
        dns.insert(dn.id, dn.clone());
        Ok(dn)
    }

    fn get(&self, id: DeliveryNoteId) -> Result<DeliveryNote> {
        self.delivery_notes
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("DeliveryNote", id))
    }

    fn find_by_number(&self, number: &str) -> Result<Option<DeliveryNote>> {
        Ok(self
            .delivery_notes
            .lock()
            .values()
            .find(|d| d.number == number)
            .cloned())
    }

    fn save(&self, dn: DeliveryNote) -> Result<DeliveryNote> {
        let mut dns = self.delivery_notes.lock();
        if !dns.contains_key(&dn.id) {
            return Err(Error::not_found("DeliveryNote", dn.id));
        }
        dns.insert(dn.id, dn.clone());
        Ok(dn)
    }

    fn list(&self) -> Result<Vec<DeliveryNote>> {
        Ok(self.delivery_notes.lock().values().cloned().collect())
    }
}

impl AlertRepository for InMemoryStore {
    fn create(&self, alert: Alert) -> Result<Alert> {
        self.alerts.lock().push(alert.clone());
        Ok(alert)
    }

    fn list(&self) -> Result<Vec<Alert>> {
        Ok(self.alerts.lock().clone())
    }

    fn exists_in_bucket(
        &self,
        alert_type: AlertType,
        item_id: Option<ItemId>,
        batch_id: Option<BatchId>,
        severity: Option<warehouse_core::AlertSeverity>,
        bucket_start: NaiveDate,
        bucket_end: NaiveDate,
    ) -> Result<bool> {
        Ok(self.alerts.lock().iter().any(|a| {
            a.alert_type == alert_type
                && a.item_id == item_id
                && a.batch_id == batch_id
                && severity.map_or(true, |s| a.severity == s)
                && a.created_at.date_naive() >= bucket_start
                && a.created_at.date_naive() <= bucket_end
        }))
    }
}

impl NumberSequenceStore for InMemoryStore {
    fn next(&self, prefix: &str, date: NaiveDate, width: usize) -> Result<String> {
        let key = format!("{prefix}-{}", date.format("%y%m%d"));
        let mut sequences = self.sequences.lock();
        let counter = sequences.entry(key.clone()).or_insert(0);
        *counter += 1;
        let max = 10u32.pow(width as u32) - 1;
        if *counter > max {
            return Err(Error::validation(format!(
                "numbering overflow: {key} exceeded {max} sequences for the day"
            )));
        }
        Ok(format!("{key}-{:0width$}", counter, width = width))
    }
}
