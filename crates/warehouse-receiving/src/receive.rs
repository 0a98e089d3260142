//! Receive-single and receive-multiple (spec §4.C).

use crate::numbering::{self, DocumentKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use warehouse_core::{Batch, Clock, Error, ItemId, LocationId, Movement, MovementType, Quantity, Result, UserId};
use warehouse_store::{BatchRepository, ItemRepository, LocationRepository, Store};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveLine {
    pub item_id: ItemId,
    pub quantity: Quantity,
    pub expiration_date: NaiveDate,
    pub batch_number: Option<String>,
    pub supplier_batch_number: Option<String>,
    pub location_id: Option<LocationId>,
    pub receipt_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

fn validate_line(store: &dyn Store, clock: &dyn Clock, line: &ReceiveLine) -> Result<()> {
    ItemRepository::get(store, line.item_id)?;

    if let Some(location_id) = line.location_id {
        let location = LocationRepository::get(store, location_id)?;
        if !location.is_active {
            return Err(Error::validation(format!(
                "location {} is not active",
                location_id
            )));
        }
    }

    if !line.quantity.is_positive() {
        return Err(Error::validation("received quantity must be positive"));
    }

    let today = clock.today();
    if line.expiration_date < today {
        return Err(Error::validation("expiration_date must not be in the past"));
    }
    if let Some(receipt_date) = line.receipt_date {
        if receipt_date > today {
            return Err(Error::validation("receipt_date must not be in the future"));
        }
    }
    if let Some(number) = &line.batch_number {
        if BatchRepository::find_by_number(store, number)?.is_some() {
            return Err(Error::conflict(format!("batch_number '{number}' already exists")));
        }
    }

    Ok(())
}

fn materialize_batch(store: &dyn Store, clock: &dyn Clock, line: &ReceiveLine) -> Result<Batch> {
    let today = clock.today();
    let batch_number = match &line.batch_number {
        Some(n) => n.clone(),
        None => numbering::generate_number(store, clock, DocumentKind::Batch)?,
    };
    let receipt_date = line.receipt_date.unwrap_or(today);
    let batch = Batch::new(
        line.item_id,
        batch_number,
        line.quantity,
        receipt_date,
        line.expiration_date,
        line.location_id,
        line.supplier_batch_number.clone(),
        line.notes.clone(),
    );
    BatchRepository::create(store, batch)
}

/// Receive-single contract: validate, generate/validate the batch number,
/// generate a GRN, create the batch, and emit its opening RECEIPT
/// movement.
#[instrument(skip(store, clock))]
pub fn receive_single(
    store: &dyn Store,
    clock: &dyn Clock,
    line: ReceiveLine,
    user_id: UserId,
) -> Result<(Batch, Movement, String)> {
    validate_line(store, clock, &line)?;
    let batch = materialize_batch(store, clock, &line)?;
    let grn = numbering::generate_number(store, clock, DocumentKind::Grn)?;
    let movement = warehouse_ledger::record_movement(
        store,
        clock,
        batch.id,
        MovementType::Receipt,
        line.quantity,
        user_id,
        Some(grn.clone()),
        None,
    )?;
    Ok((batch, movement, grn))
}

/// Receive-multiple contract: same semantics as receive-single, but every
/// batch shares one GRN number and the whole operation is atomic — every
/// line is validated *before* any batch is created, so a failure on line N
/// never leaves lines 1..N-1 committed.
#[instrument(skip(store, clock, lines))]
pub fn receive_multiple(
    store: &dyn Store,
    clock: &dyn Clock,
    lines: Vec<ReceiveLine>,
    user_id: UserId,
) -> Result<(Vec<Batch>, Vec<Movement>, String)> {
    if lines.is_empty() {
        return Err(Error::validation("receive_multiple requires at least one line"));
    }
    for line in &lines {
        validate_line(store, clock, line)?;
    }

    let grn = numbering::generate_number(store, clock, DocumentKind::Grn)?;
    let mut batches = Vec::with_capacity(lines.len());
    let mut movements = Vec::with_capacity(lines.len());

    for line in &lines {
        let batch = materialize_batch(store, clock, line)?;
        let movement = warehouse_ledger::record_movement(
            store,
            clock,
            batch.id,
            MovementType::Receipt,
            line.quantity,
            user_id,
            Some(grn.clone()),
            None,
        )?;
        batches.push(batch);
        movements.push(movement);
    }

    Ok((batches, movements, grn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use warehouse_core::{FixedClock, Item, Money};
    use warehouse_store::InMemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed_item(store: &InMemoryStore) -> ItemId {
        let item = Item::new(
            "SKU-1",
            "Black Ink",
            "Acme",
            "L",
            Money::new(dec!(5.00)),
            "ILS",
            Quantity::new(dec!(50)),
            Quantity::new(dec!(10)),
            Quantity::new(dec!(1000)),
        );
        let id = item.id;
        ItemRepository::create(store, item).unwrap();
        id
    }

    #[test]
    fn receive_single_creates_active_batch_with_opening_receipt() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 5));
        let item_id = seed_item(&store);

        let (batch, movement, grn) = receive_single(
            &store,
            &clock,
            ReceiveLine {
                item_id,
                quantity: Quantity::new(dec!(200)),
                expiration_date: date(2026, 6, 1),
                batch_number: None,
                supplier_batch_number: None,
                location_id: None,
                receipt_date: None,
                notes: None,
            },
            UserId::new(),
        )
        .unwrap();

        assert_eq!(batch.quantity_available, Quantity::new(dec!(200)));
        assert_eq!(batch.batch_number, "GR-260305-001");
        assert_eq!(grn, "GRN-260305-001");
        assert_eq!(movement.quantity_before, Quantity::zero());
        assert_eq!(movement.quantity_after, Quantity::new(dec!(200)));
        assert_eq!(movement.reference_number.as_deref(), Some(grn.as_str()));
    }

    #[test]
    fn receive_multiple_shares_one_grn_and_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 5));
        let item_id = seed_item(&store);

        let good_line = ReceiveLine {
            item_id,
            quantity: Quantity::new(dec!(10)),
            expiration_date: date(2026, 6, 1),
            batch_number: None,
            supplier_batch_number: None,
            location_id: None,
            receipt_date: None,
            notes: None,
        };
        let mut bad_line = good_line.clone();
        bad_line.quantity = Quantity::new(dec!(-5));

        let err = receive_multiple(&store, &clock, vec![good_line.clone(), bad_line], UserId::new()).unwrap_err();
        assert_eq!(err.code().as_str(), "VALIDATION_ERROR");
        assert!(BatchRepository::list_by_item(&store, item_id).unwrap().is_empty());

        let (batches, _movements, grn) =
            receive_multiple(&store, &clock, vec![good_line.clone(), good_line], UserId::new()).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].batch_number, "GR-260305-001");
        assert_eq!(batches[1].batch_number, "GR-260305-002");
        assert_eq!(grn, "GRN-260305-001");
    }
}
