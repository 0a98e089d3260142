//! DeliveryNote and its state machine.
//!
//! ```text
//!         create()
//!            |
//!         DRAFT --issue()--> ISSUED --deliver()--> DELIVERED --invoice()--> INVOICED
//!            |                  |                       |
//!            +--cancel()--------+--cancel()-------------+
//!                               v
//!                           CANCELLED (terminal)
//! ```
//!
//! Dispatch movements are recorded at DN creation (DRAFT), not at `issue()`
//! — see `warehouse-receiving::delivery_notes`. The state machine here only
//! governs status/timestamp transitions.

use crate::error::{Error, Result};
use crate::ids::{BatchId, CustomerId, DeliveryNoteId, ItemId, UserId};
use crate::money::Quantity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryNoteStatus {
    Draft,
    Issued,
    Delivered,
    Invoiced,
    Cancelled,
}

impl DeliveryNoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryNoteStatus::Draft => "DRAFT",
            DeliveryNoteStatus::Issued => "ISSUED",
            DeliveryNoteStatus::Delivered => "DELIVERED",
            DeliveryNoteStatus::Invoiced => "INVOICED",
            DeliveryNoteStatus::Cancelled => "CANCELLED",
        }
    }

    /// Whether `self -> next` is a legal transition per the state machine.
    pub fn can_transition_to(&self, next: DeliveryNoteStatus) -> bool {
        use DeliveryNoteStatus::*;
        matches!(
            (self, next),
            (Draft, Issued)
                | (Issued, Delivered)
                | (Delivered, Invoiced)
                | (Draft, Cancelled)
                | (Issued, Cancelled)
                | (Delivered, Cancelled)
        )
    }
}

impl std::fmt::Display for DeliveryNoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryNoteItem {
    pub item_id: ItemId,
    pub batch_id: BatchId,
    pub quantity: Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryNote {
    pub id: DeliveryNoteId,
    pub number: String,
    pub customer_id: CustomerId,
    pub created_by: UserId,
    pub status: DeliveryNoteStatus,
    pub issue_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub is_consignment: bool,
    pub notes: Option<String>,
    pub items: Vec<DeliveryNoteItem>,
}

impl DeliveryNote {
    pub fn new(
        number: impl Into<String>,
        customer_id: CustomerId,
        created_by: UserId,
        is_consignment: bool,
        notes: Option<String>,
        items: Vec<DeliveryNoteItem>,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::validation("a delivery note must have at least one line item"));
        }
        Ok(Self {
            id: DeliveryNoteId::new(),
            number: number.into(),
            customer_id,
            created_by,
            status: DeliveryNoteStatus::Draft,
            issue_date: None,
            delivery_date: None,
            is_consignment,
            notes,
            items,
        })
    }

    /// Applies a status transition, stamping `issue_date`/`delivery_date`
    /// the first time their target status is entered.
    pub fn transition(&mut self, next: DeliveryNoteStatus, today: NaiveDate) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(Error::validation(format!(
                "cannot transition delivery note from {} to {}",
                self.status, next
            )));
        }
        match next {
            DeliveryNoteStatus::Issued if self.issue_date.is_none() => {
                self.issue_date = Some(today);
            }
            DeliveryNoteStatus::Delivered if self.delivery_date.is_none() => {
                self.delivery_date = Some(today);
            }
            _ => {}
        }
        self.status = next;
        Ok(())
    }

    pub fn total_quantity(&self) -> Quantity {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
