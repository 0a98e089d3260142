//! Opaque UUID identifiers for every entity in the domain model.
//!
//! Newtypes prevent an `ItemId` from being passed where a `BatchId` is
//! expected — a mistake the original's raw `UUID` columns could not catch
//! at compile time.

use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID (e.g. one read back from storage).
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id!(ItemId, "Identifies an Item (ink product).");
uuid_id!(BatchId, "Identifies a Batch (a received lot of an Item).");
uuid_id!(MovementId, "Identifies an immutable Movement (ledger entry).");
uuid_id!(LocationId, "Identifies a warehouse storage Location.");
uuid_id!(CustomerId, "Identifies a Customer.");
uuid_id!(DeliveryNoteId, "Identifies a DeliveryNote.");
uuid_id!(AlertId, "Identifies an Alert.");
uuid_id!(UserId, "Identifies the acting user/operator; auth itself is out of core scope.");
