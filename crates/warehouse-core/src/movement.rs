//! Movement: one immutable ledger entry. Never updated or deleted once
//! written — the Ledger component only ever appends.

use crate::ids::{BatchId, MovementId, UserId};
use crate::money::Quantity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementType {
    Receipt,
    Dispatch,
    Adjustment,
    Scrap,
    Transfer,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Receipt => "RECEIPT",
            MovementType::Dispatch => "DISPATCH",
            MovementType::Adjustment => "ADJUSTMENT",
            MovementType::Scrap => "SCRAP",
            MovementType::Transfer => "TRANSFER",
        }
    }

    /// Whether this movement type increases on-hand quantity by default.
    /// ADJUSTMENT is sign-carrying and handled separately by the ledger.
    pub fn is_inbound(&self) -> bool {
        matches!(self, MovementType::Receipt)
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub batch_id: BatchId,
    pub user_id: UserId,
    pub movement_type: MovementType,
    /// Always stored positive; direction is implied by `movement_type`.
    pub quantity: Quantity,
    pub quantity_before: Quantity,
    pub quantity_after: Quantity,
    pub reference_number: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Movement {
    /// The signed delta this movement applied: `quantity_after - quantity_before`.
    pub fn signed_delta(&self) -> Quantity {
        self.quantity_after - self.quantity_before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn signed_delta_matches_before_after() {
        let m = Movement {
            id: MovementId::new(),
            batch_id: BatchId::new(),
            user_id: UserId::new(),
            movement_type: MovementType::Dispatch,
            quantity: Quantity::new(dec!(30)),
            quantity_before: Quantity::new(dec!(100)),
            quantity_after: Quantity::new(dec!(70)),
            reference_number: None,
            timestamp: Utc::now(),
            notes: None,
        };
        assert_eq!(m.signed_delta(), Quantity::new(dec!(-30)));
    }
}
