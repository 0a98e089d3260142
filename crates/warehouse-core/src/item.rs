//! Item: a stocked ink product. Owns its Batches (RESTRICT on delete — an
//! Item may only be removed once no Batch references it; the deletion
//! check itself lives in `warehouse-store`, not here).

use crate::ids::ItemId;
use crate::money::{Money, Quantity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub sku: String,
    pub name: String,
    pub supplier: String,
    pub unit_of_measure: String,
    pub cost_price: Money,
    pub currency: String,
    pub reorder_point: Quantity,
    pub min_stock: Quantity,
    pub max_stock: Quantity,
}

impl Item {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        supplier: impl Into<String>,
        unit_of_measure: impl Into<String>,
        cost_price: Money,
        currency: impl Into<String>,
        reorder_point: Quantity,
        min_stock: Quantity,
        max_stock: Quantity,
    ) -> Self {
        Self {
            id: ItemId::new(),
            sku: sku.into(),
            name: name.into(),
            supplier: supplier.into(),
            unit_of_measure: unit_of_measure.into(),
            cost_price,
            currency: currency.into(),
            reorder_point,
            min_stock,
            max_stock,
        }
    }
}
