//! Background workers.

pub mod subscription_sweeper;

pub use subscription_sweeper::{SubscriptionSweeper, SweeperHandle};
