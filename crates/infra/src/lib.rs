//! Infrastructure layer: storage, payment provider client, background workers.

pub mod payments;
pub mod store;
pub mod workers;
