// warehouse-core - Platform-agnostic domain logic
//
// This crate contains the PURE domain model for the perishable-ink
// warehouse: entities, invariants, and the stable error taxonomy.
// No I/O, no async, no persistence — those live in warehouse-store and
// the service crates built on top of it.
//
// Philosophy (Fred Brooks): "Separate essence from accident"
// - Essence: what a Batch, Movement, or Alert *is* and what must hold
// - Accident: how it is stored, queried, or exposed over a wire

pub mod alert;
pub mod batch;
pub mod clock;
pub mod customer;
pub mod delivery_note;
pub mod error;
pub mod ids;
pub mod item;
pub mod location;
pub mod money;
pub mod movement;
pub mod render;

pub use alert::{Alert, AlertSeverity, AlertType};
pub use batch::{Batch, BatchStatus};
pub use clock::{Clock, FixedClock, SystemClock};
pub use customer::Customer;
pub use delivery_note::{DeliveryNote, DeliveryNoteItem, DeliveryNoteStatus};
pub use error::{Error, ErrorCode, Result};
pub use ids::{
    AlertId, BatchId, CustomerId, DeliveryNoteId, ItemId, LocationId, MovementId, UserId,
};
pub use item::Item;
pub use location::Location;
pub use money::{Money, Quantity};
pub use movement::{Movement, MovementType};
pub use render::{DeliveryNoteRenderInput, RenderLineItem};
