//! Pure data assembly for the delivery-note PDF renderer contract. The
//! renderer itself (byte-stream production) is an opaque external
//! collaborator; only the input it consumes is this crate's concern.

use crate::batch::Batch;
use crate::customer::Customer;
use crate::delivery_note::DeliveryNote;
use crate::item::Item;
use crate::money::Quantity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderLineItem {
    pub sku: String,
    pub name: String,
    pub batch_number: String,
    pub expiration_date: NaiveDate,
    pub quantity: Quantity,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryNoteRenderInput {
    pub dn_number: String,
    pub issue_date: Option<NaiveDate>,
    pub customer_name: String,
    pub customer_address: Option<String>,
    pub customer_contact_person: Option<String>,
    pub is_consignment: bool,
    pub items: Vec<RenderLineItem>,
    pub total_quantity: Quantity,
    pub notes: Option<String>,
    pub created_by_name: String,
}

/// Assembles the exact shape the PDF renderer contract expects from the
/// materialized DN, its customer, and the (item, batch, quantity) triples
/// for each line — the join the store performs before handing off to
/// rendering.
pub fn build_render_input(
    dn: &DeliveryNote,
    customer: &Customer,
    lines: &[(Item, Batch, Quantity)],
    created_by_name: impl Into<String>,
) -> DeliveryNoteRenderInput {
    let items = lines
        .iter()
        .map(|(item, batch, quantity)| RenderLineItem {
            sku: item.sku.clone(),
            name: item.name.clone(),
            batch_number: batch.batch_number.clone(),
            expiration_date: batch.expiration_date,
            quantity: *quantity,
            unit: item.unit_of_measure.clone(),
        })
        .collect();

    DeliveryNoteRenderInput {
        dn_number: dn.number.clone(),
        issue_date: dn.issue_date,
        customer_name: customer.name.clone(),
        customer_address: customer.address.clone(),
        customer_contact_person: customer.contact_person.clone(),
        is_consignment: dn.is_consignment,
        items,
        total_quantity: dn.total_quantity(),
        notes: dn.notes.clone(),
        created_by_name: created_by_name.into(),
    }
}
