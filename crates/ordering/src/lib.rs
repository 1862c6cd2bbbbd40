//! Ordering domain module.
//!
//! Cart contracts, the order pricing engine, and the order lifecycle. Pricing
//! is a pure function over a catalog snapshot; persistence belongs to the
//! infrastructure layer and happens only after pricing succeeds.

pub mod cart;
pub mod error;
pub mod order;
pub mod pricing;

pub use cart::{CartLine, OptionSelection};
pub use error::PricingError;
pub use order::{CustomerContact, Order, OrderLineItem, OrderStatus, OrderUpdate, SelectedOption};
pub use pricing::{OptionResolution, PricedLine, PricedOrder, price_order, resolve_option};
