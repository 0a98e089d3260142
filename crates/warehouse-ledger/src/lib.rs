// warehouse-ledger - Component A: the append-only movement ledger
//
// The authoritative record of stock mutation. Every other component in
// the workspace drives stock changes through `record_movement` — the
// FEFO engine never mutates a batch directly, and neither does receiving
// or the alert generator's manual-scrap path.

use tracing::instrument;
use warehouse_core::{Batch, BatchId, Clock, Error, Money, Movement, MovementType, Quantity, Result, UserId};
use warehouse_store::{MovementFilter, Store};

/// `record_movement` contract (spec §4.A): locks the batch row, computes
/// the new `quantity_available` per movement type, appends an immutable
/// Movement, and returns it. Fails atomically — no partial writes.
#[instrument(skip(store, clock), fields(batch_id = %batch_id, movement_type = %movement_type))]
pub fn record_movement(
    store: &dyn Store,
    clock: &dyn Clock,
    batch_id: BatchId,
    movement_type: MovementType,
    quantity: Quantity,
    user_id: UserId,
    reference_number: Option<String>,
    notes: Option<String>,
) -> Result<Movement> {
    let now = clock.now();

    let (_, movement) = store.record_movement(batch_id, &mut |current: &Batch| {
        let (next, mv_quantity, qb, qa) = compute_next(current, movement_type, quantity)?;
        Ok((
            next,
            Movement {
                id: warehouse_core::MovementId::new(),
                batch_id,
                user_id,
                movement_type,
                quantity: mv_quantity,
                quantity_before: qb,
                quantity_after: qa,
                reference_number: reference_number.clone(),
                timestamp: now,
                notes: notes.clone(),
            },
        ))
    })?;

    tracing::debug!(movement_id = %movement.id, "recorded movement");
    Ok(movement)
}

/// Computes the batch's next state for one movement, without touching the
/// store. Pure so the full branch table is unit-testable without a store.
fn compute_next(
    current: &Batch,
    movement_type: MovementType,
    quantity: Quantity,
) -> Result<(Batch, Quantity, Quantity, Quantity)> {
    let qb = current.quantity_available;

    let qa = match movement_type {
        MovementType::Receipt => {
            if !quantity.is_positive() {
                return Err(Error::validation("RECEIPT quantity must be positive"));
            }
            qb + quantity
        }
        MovementType::Dispatch | MovementType::Scrap | MovementType::Transfer => {
            if !quantity.is_positive() {
                return Err(Error::validation(format!(
                    "{movement_type} quantity must be positive"
                )));
            }
            if movement_type == MovementType::Dispatch
                && current.status == warehouse_core::BatchStatus::Scrap
            {
                return Err(Error::validation_with_status(
                    "cannot dispatch from a batch in SCRAP status",
                    current.status,
                ));
            }
            if quantity > qb {
                return Err(Error::insufficient_stock(qb, quantity));
            }
            qb - quantity
        }
        MovementType::Adjustment => {
            let candidate = qb + quantity;
            if candidate.is_negative() {
                return Err(Error::validation(
                    "adjustment would make quantity_available negative",
                ));
            }
            candidate
        }
    };

    let mut next = current.clone();
    next.quantity_available = qa;
    next.version += 1;
    next.status = if next.status == warehouse_core::BatchStatus::Scrap {
        // SCRAP is terminal (invariant 5) — no movement reopens it.
        warehouse_core::BatchStatus::Scrap
    } else if qa.is_zero() {
        warehouse_core::BatchStatus::Depleted
    } else if next.status == warehouse_core::BatchStatus::Depleted {
        warehouse_core::BatchStatus::Active
    } else {
        next.status
    };

    let magnitude = if qa >= qb { qa - qb } else { qb - qa };
    Ok((next, magnitude, qb, qa))
}

/// `history` contract (spec §4.A): Movements ordered newest-first,
/// filterable by batch/item/type/date window, capped at 500 regardless of
/// the caller's requested limit.
#[instrument(skip(store))]
pub fn history(store: &dyn Store, filter: MovementFilter) -> Result<Vec<Movement>> {
    store.history(&filter)
}

/// `adjust_to` (spec §4.A, supplemented per `inventory_service.adjust_quantity`):
/// computes the signed delta against current `quantity_available` and
/// drives it through `record_movement` as an ADJUSTMENT.
#[instrument(skip(store, clock))]
pub fn adjust_to(
    store: &dyn Store,
    clock: &dyn Clock,
    batch_id: BatchId,
    target_quantity: Quantity,
    user_id: UserId,
    reason: impl Into<String>,
) -> Result<Movement> {
    let current = store.get(batch_id)?;
    let delta = target_quantity - current.quantity_available;
    record_movement(
        store,
        clock,
        batch_id,
        MovementType::Adjustment,
        delta,
        user_id,
        None,
        Some(reason.into()),
    )
}

/// A cost valuation helper reused by `warehouse-fefo::stock_summary`:
/// `quantity * cost_price`, clamped to `Money`'s two-decimal scale.
pub fn line_value(quantity: Quantity, cost_price: Money) -> Money {
    cost_price
        .checked_mul_quantity(quantity)
        .unwrap_or(Money::zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use warehouse_core::{FixedClock, ItemId};
    use warehouse_store::{BatchRepository, InMemoryStore};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded_batch(store: &InMemoryStore, qty: &str) -> BatchId {
        let batch = Batch::new(
            ItemId::new(),
            "GR-260305-001",
            Quantity::new(qty.parse().unwrap()),
            date(2026, 3, 5),
            date(2026, 6, 1),
            None,
            None,
            None,
        );
        let id = batch.id;
        store.create(batch).unwrap();
        id
    }

    #[test]
    fn dispatch_reduces_available_and_records_before_after() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 6));
        let batch_id = seeded_batch(&store, "100");

        let mv = record_movement(
            &store,
            &clock,
            batch_id,
            MovementType::Dispatch,
            Quantity::new(dec!(30)),
            UserId::new(),
            None,
            None,
        )
        .unwrap();

        assert_eq!(mv.quantity_before, Quantity::new(dec!(100)));
        assert_eq!(mv.quantity_after, Quantity::new(dec!(70)));
        assert_eq!(store.get(batch_id).unwrap().quantity_available, Quantity::new(dec!(70)));
    }

    #[test]
    fn dispatch_beyond_available_fails_and_leaves_batch_unchanged() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 6));
        let batch_id = seeded_batch(&store, "100");

        record_movement(
            &store,
            &clock,
            batch_id,
            MovementType::Dispatch,
            Quantity::new(dec!(30)),
            UserId::new(),
            None,
            None,
        )
        .unwrap();

        let err = record_movement(
            &store,
            &clock,
            batch_id,
            MovementType::Dispatch,
            Quantity::new(dec!(80)),
            UserId::new(),
            None,
            None,
        )
        .unwrap_err();

        assert_eq!(err.code().as_str(), "INSUFFICIENT_STOCK");
        assert_eq!(store.get(batch_id).unwrap().quantity_available, Quantity::new(dec!(70)));
    }

    #[test]
    fn dispatch_zeroing_quantity_marks_batch_depleted() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 6));
        let batch_id = seeded_batch(&store, "30");

        record_movement(
            &store,
            &clock,
            batch_id,
            MovementType::Dispatch,
            Quantity::new(dec!(30)),
            UserId::new(),
            None,
            None,
        )
        .unwrap();

        assert_eq!(store.get(batch_id).unwrap().status, warehouse_core::BatchStatus::Depleted);
    }

    #[test]
    fn adjustment_can_be_negative_but_not_below_zero() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 6));
        let batch_id = seeded_batch(&store, "10");

        let err = record_movement(
            &store,
            &clock,
            batch_id,
            MovementType::Adjustment,
            Quantity::new(dec!(-20)),
            UserId::new(),
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err.code().as_str(), "VALIDATION_ERROR");
    }

    #[test]
    fn dispatch_from_scrap_batch_is_rejected() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 6));
        let batch_id = seeded_batch(&store, "10");
        let mut b = store.get(batch_id).unwrap();
        b.status = warehouse_core::BatchStatus::Scrap;
        store.save(b).unwrap();

        let err = record_movement(
            &store,
            &clock,
            batch_id,
            MovementType::Dispatch,
            Quantity::new(dec!(1)),
            UserId::new(),
            None,
            None,
        )
        .unwrap_err();
        match err {
            Error::ValidationError { status, .. } => {
                assert_eq!(status, Some(warehouse_core::BatchStatus::Scrap))
            }
            _ => panic!("expected ValidationError"),
        }
    }

    #[test]
    fn adjustment_on_scrap_batch_does_not_leave_terminal_status() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 6));
        let batch_id = seeded_batch(&store, "10");
        let mut b = store.get(batch_id).unwrap();
        b.status = warehouse_core::BatchStatus::Scrap;
        store.save(b).unwrap();

        let mv = record_movement(
            &store,
            &clock,
            batch_id,
            MovementType::Adjustment,
            Quantity::new(dec!(-10)),
            UserId::new(),
            None,
            Some("write off remainder".to_string()),
        )
        .unwrap();

        assert_eq!(mv.quantity_after, Quantity::new(dec!(0)));
        assert_eq!(store.get(batch_id).unwrap().status, warehouse_core::BatchStatus::Scrap);
    }

    #[test]
    fn adjust_to_computes_signed_delta() {
        let store = InMemoryStore::new();
        let clock = FixedClock::at_date(date(2026, 3, 6));
        let batch_id = seeded_batch(&store, "50");

        let mv = adjust_to(
            &store,
            &clock,
            batch_id,
            Quantity::new(dec!(42)),
            UserId::new(),
            "cycle count correction",
        )
        .unwrap();

        assert_eq!(mv.quantity_after, Quantity::new(dec!(42)));
        assert_eq!(mv.movement_type, MovementType::Adjustment);
    }
}
