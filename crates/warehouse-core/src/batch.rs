//! Batch: a physically and legally distinct lot of an Item, carrying a
//! single expiration date. The unit the Ledger and FEFO Engine both orbit.

use crate::ids::{BatchId, ItemId, LocationId};
use crate::money::Quantity;
use crate::movement::Movement;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    Active,
    Scrap,
    Depleted,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Active => "ACTIVE",
            BatchStatus::Scrap => "SCRAP",
            BatchStatus::Depleted => "DEPLETED",
        }
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub item_id: ItemId,
    pub location_id: Option<LocationId>,
    pub batch_number: String,
    pub supplier_batch_number: Option<String>,
    pub quantity_received: Quantity,
    pub quantity_available: Quantity,
    pub receipt_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub status: BatchStatus,
    pub version: u64,
    pub notes: Option<String>,
}

impl Batch {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        item_id: ItemId,
        batch_number: impl Into<String>,
        quantity: Quantity,
        receipt_date: NaiveDate,
        expiration_date: NaiveDate,
        location_id: Option<LocationId>,
        supplier_batch_number: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: BatchId::new(),
            item_id,
            location_id,
            batch_number: batch_number.into(),
            supplier_batch_number,
            quantity_received: quantity,
            quantity_available: quantity,
            receipt_date,
            expiration_date,
            status: BatchStatus::Active,
            version: 0,
            notes,
        }
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date < today
    }

    pub fn days_until_expiration(&self, today: NaiveDate) -> i64 {
        (self.expiration_date - today).num_days()
    }

    pub fn is_pickable(&self, today: NaiveDate) -> bool {
        self.status == BatchStatus::Active
            && self.quantity_available.is_positive()
            && !self.is_expired(today)
    }

    /// Invariant 1 of the data model: the batch could never have been
    /// received after it expires.
    pub fn dates_are_consistent(&self) -> bool {
        self.expiration_date >= self.receipt_date
    }

    /// Invariant 3: on-hand equals received plus every signed movement,
    /// **except** for a batch the automatic expiry check has scrapped —
    /// that path deliberately leaves `quantity_available` untouched as an
    /// audit trail of what was lost (see the Alert Generator's expired-batch
    /// check). A batch manually scrapped via `record_movement` has a real
    /// SCRAP movement in `movements` and satisfies the equation normally.
    pub fn conserves_ledger(&self, movements: &[Movement], auto_scrapped: bool) -> bool {
        if auto_scrapped {
            return true;
        }
        let total: Quantity = movements.iter().map(Movement::signed_delta).sum();
        self.quantity_available == self.quantity_received + total
    }
}
