//! Warehouse storage locations. Batches weakly reference a `Location`
//! (`Option<LocationId>`, SET NULL semantics on deactivation-cascade is a
//! store-layer concern); the core only needs the id and a human-readable
//! code for FEFO suggestions.

use crate::ids::LocationId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub warehouse: String,
    pub shelf: String,
    pub position: String,
    pub is_active: bool,
}

impl Location {
    pub fn new(warehouse: impl Into<String>, shelf: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            id: LocationId::new(),
            warehouse: warehouse.into(),
            shelf: shelf.into(),
            position: position.into(),
            is_active: true,
        }
    }

    /// `{warehouse}-{shelf}-{position}`, the compact code FEFO suggestions
    /// surface to callers instead of the raw location row.
    pub fn location_code(&self) -> String {
        format!("{}-{}-{}", self.warehouse, self.shelf, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_code_joins_fields() {
        let loc = Location::new("WH1", "A", "12");
        assert_eq!(loc.location_code(), "WH1-A-12");
    }
}
