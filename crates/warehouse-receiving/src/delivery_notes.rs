//! The delivery-note state machine and its dispatch-movement side effect
//! (spec §4.C, SPEC_FULL §4).

use crate::numbering::{self, DocumentKind};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use warehouse_core::{
    BatchId, Clock, CustomerId, DeliveryNote, DeliveryNoteItem, DeliveryNoteStatus, Error, ItemId,
    MovementType, Quantity, Result, UserId,
};
use warehouse_store::{CustomerRepository, DeliveryNoteRepository, Store};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnLine {
    pub item_id: ItemId,
    pub batch_id: BatchId,
    pub quantity: Quantity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeliveryNoteInput {
    pub customer_id: CustomerId,
    pub created_by: UserId,
    pub is_consignment: bool,
    pub notes: Option<String>,
    pub lines: Vec<DnLine>,
}

/// `create_delivery_note` (SPEC_FULL §4): validates each line via
/// `warehouse_fefo::validate` (hard errors abort the whole operation
/// before anything is written; FEFO-deviation warnings are returned to
/// the caller alongside the created DN rather than discarded), then
/// records one DISPATCH movement per line against its picked batch with a
/// shared dispatch reference number — all inside DRAFT, per spec's note
/// that the ledger reflects stock leaving as soon as the DN exists, not
/// at `issue()`.
#[instrument(skip(store, clock, input))]
pub fn create_delivery_note(
    store: &dyn Store,
    clock: &dyn Clock,
    input: CreateDeliveryNoteInput,
) -> Result<(DeliveryNote, Vec<warehouse_fefo::Validation>)> {
    CustomerRepository::get(store, input.customer_id)?;

    if input.lines.is_empty() {
        return Err(Error::validation("a delivery note must have at least one line item"));
    }

    let mut validations = Vec::with_capacity(input.lines.len());
    for line in &input.lines {
        let validation = warehouse_fefo::validate(store, clock, line.batch_id, line.quantity)?;
        if !validation.ok {
            let detail = validation
                .errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "validation failed".to_string());
            return Err(Error::validation(format!(
                "delivery note line for batch {} rejected: {detail}",
                line.batch_id
            )));
        }
        validations.push(validation);
    }

    let number = numbering::generate_number(store, clock, DocumentKind::DeliveryNote)?;
    let items: Vec<DeliveryNoteItem> = input
        .lines
        .iter()
        .map(|l| DeliveryNoteItem {
            item_id: l.item_id,
            batch_id: l.batch_id,
            quantity: l.quantity,
        })
        .collect();

    let dn = DeliveryNote::new(
        number,
        input.customer_id,
        input.created_by,
        input.is_consignment,
        input.notes.clone(),
        items,
    )?;
    let dn = DeliveryNoteRepository::create(store, dn)?;

    let dispatch_reference = numbering::generate_number(store, clock, DocumentKind::Dispatch)?;
    for line in &input.lines {
        warehouse_ledger::record_movement(
            store,
            clock,
            line.batch_id,
            MovementType::Dispatch,
            line.quantity,
            input.created_by,
            Some(dispatch_reference.clone()),
            None,
        )?;
    }

    Ok((dn, validations))
}

/// Drives one state-machine transition and persists the result.
#[instrument(skip(store, clock))]
pub fn transition_delivery_note(
    store: &dyn Store,
    clock: &dyn Clock,
    dn_id: warehouse_core::DeliveryNoteId,
    next: DeliveryNoteStatus,
) -> Result<DeliveryNote> {
    let mut dn = DeliveryNoteRepository::get(store, dn_id)?;
    dn.transition(next, clock.today())?;
    DeliveryNoteRepository::save(store, dn)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationOutcome {
    pub delivery_note: DeliveryNote,
    /// Always `false` today — see the Open Question resolution on DN
    /// cancellation (SPEC_FULL §5.2): no compensating RECEIPT is emitted,
    /// so stock dispatched at DN creation is never restored by cancelling.
    pub stock_restored: bool,
    pub warning: String,
}

/// Cancels a delivery note. This only transitions status — it does not
/// synthesize a compensating movement, matching the source's behavior.
#[instrument(skip(store, clock))]
pub fn cancel_delivery_note(
    store: &dyn Store,
    clock: &dyn Clock,
    dn_id: warehouse_core::DeliveryNoteId,
) -> Result<CancellationOutcome> {
    let dn = transition_delivery_note(store, clock, dn_id, DeliveryNoteStatus::Cancelled)?;
    Ok(CancellationOutcome {
        delivery_note: dn,
        stock_restored: false,
        warning: "cancelling a delivery note does not restore dispatched stock; \
                  issue a manual ADJUSTMENT or RECEIPT movement if the goods were returned"
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use warehouse_core::{Batch, Customer, FixedClock, MovementType as MT};
    use warehouse_store::BatchRepository;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed(store: &warehouse_store::InMemoryStore) -> (ItemId, BatchId, CustomerId) {
        let item_id = ItemId::new();
        let batch = Batch::new(
            item_id,
            "GR-260305-001",
            Quantity::new(dec!(100)),
            date(2026, 3, 1),
            date(2026, 6, 1),
            None,
            None,
            None,
        );
        let batch_id = batch.id;
        BatchRepository::create(store, batch).unwrap();
        let customer = Customer::new("Print Shop");
        let customer_id = customer.id;
        CustomerRepository::create(store, customer).unwrap();
        (item_id, batch_id, customer_id)
    }

    /// Scenario S6: delivery-note lifecycle.
    #[test]
    fn lifecycle_stamps_dates_and_records_dispatch_at_creation() {
        let store = warehouse_store::InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 5));
        let (item_id, batch_id, customer_id) = seed(&store);
        let user_id = UserId::new();

        let (dn, validations) = create_delivery_note(
            &store,
            &clock,
            CreateDeliveryNoteInput {
                customer_id,
                created_by: user_id,
                is_consignment: false,
                notes: None,
                lines: vec![DnLine {
                    item_id,
                    batch_id,
                    quantity: Quantity::new(dec!(20)),
                }],
            },
        )
        .unwrap();

        assert!(validations[0].ok);
        assert_eq!(dn.status, DeliveryNoteStatus::Draft);
        let movements = warehouse_store::MovementRepository::list_for_batch(&store, batch_id).unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].movement_type, MT::Dispatch);
        assert_eq!(
            BatchRepository::get(&store, batch_id).unwrap().quantity_available,
            Quantity::new(dec!(80))
        );

        let clock2 = FixedClock::at_date(date(2026, 3, 6));
        let dn = transition_delivery_note(&store, &clock2, dn.id, DeliveryNoteStatus::Issued).unwrap();
        assert_eq!(dn.issue_date, Some(date(2026, 3, 6)));

        let clock3 = FixedClock::at_date(date(2026, 3, 7));
        let dn = transition_delivery_note(&store, &clock3, dn.id, DeliveryNoteStatus::Delivered).unwrap();
        assert_eq!(dn.delivery_date, Some(date(2026, 3, 7)));

        let err = transition_delivery_note(&store, &clock3, dn.id, DeliveryNoteStatus::Draft).unwrap_err();
        assert_eq!(err.code().as_str(), "VALIDATION_ERROR");
    }

    #[test]
    fn cancellation_does_not_restore_stock() {
        let store = warehouse_store::InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 5));
        let (item_id, batch_id, customer_id) = seed(&store);

        let (dn, _) = create_delivery_note(
            &store,
            &clock,
            CreateDeliveryNoteInput {
                customer_id,
                created_by: UserId::new(),
                is_consignment: false,
                notes: None,
                lines: vec![DnLine {
                    item_id,
                    batch_id,
                    quantity: Quantity::new(dec!(20)),
                }],
            },
        )
        .unwrap();

        let before = BatchRepository::get(&store, batch_id).unwrap().quantity_available;
        let outcome = cancel_delivery_note(&store, &clock, dn.id).unwrap();
        assert!(!outcome.stock_restored);
        assert_eq!(BatchRepository::get(&store, batch_id).unwrap().quantity_available, before);
        assert_eq!(outcome.delivery_note.status, DeliveryNoteStatus::Cancelled);
    }
}
