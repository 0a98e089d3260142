// warehouse-receiving - Component C: receiving and document lifecycle
//
// Deterministic batch/GRN/dispatch/DN numbering, the receive-single and
// receive-multiple entry points, the pure expiration-warning helper, and
// the delivery-note state machine.

pub mod delivery_notes;
pub mod expiration_warning;
pub mod numbering;
pub mod receive;

pub use delivery_notes::{
    cancel_delivery_note, create_delivery_note, transition_delivery_note, CancellationOutcome,
    CreateDeliveryNoteInput, DnLine,
};
pub use expiration_warning::{check as check_expiration_warning, ExpirationLevel, ExpirationWarning};
pub use numbering::{generate_number, DocumentKind};
pub use receive::{receive_multiple, receive_single, ReceiveLine};
