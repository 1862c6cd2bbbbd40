//! Establishment-scoped storage.
//!
//! Everything except establishments themselves is keyed by
//! `(EstablishmentId, id)`; callers never see records of another establishment.

pub mod establishments;
pub mod menu;
pub mod scoped_store;

pub use establishments::{EstablishmentStore, InMemoryEstablishmentStore};
pub use menu::MenuStore;
pub use scoped_store::{InMemoryScopedStore, ScopedStore};
