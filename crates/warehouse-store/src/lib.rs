// warehouse-store - the persistence seam
//
// Repository traits, one per aggregate, plus an in-memory reference
// implementation every other crate's tests (and the CLI) run against. A
// real database-backed store is a Non-goal of this workspace; these
// traits are the boundary it would implement.

pub mod in_memory;
pub mod repository;

pub use in_memory::InMemoryStore;
pub use repository::{
    AlertRepository, BatchRepository, CustomerRepository, DeliveryNoteRepository,
    ItemRepository, LedgerRepository, LocationRepository, MovementFilter, MovementRepository,
    NumberSequenceStore,
};

/// A convenience supertrait bundling every repository trait, implemented
/// automatically for anything that implements them all (`InMemoryStore`
/// today, a Postgres-backed store tomorrow). Service crates take `&dyn
/// Store` so the CLI only has to construct one concrete store.
pub trait Store:
    ItemRepository
    + LocationRepository
    + BatchRepository
    + MovementRepository
    + LedgerRepository
    + CustomerRepository
    + DeliveryNoteRepository
    + AlertRepository
    + NumberSequenceStore
{
}

impl<T> Store for T where
    T: ItemRepository
        + LocationRepository
        + BatchRepository
        + MovementRepository
        + LedgerRepository
        + CustomerRepository
        + DeliveryNoteRepository
        + AlertRepository
        + NumberSequenceStore
{
}
