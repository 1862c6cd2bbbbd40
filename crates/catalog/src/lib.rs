//! Catalog domain module.
//!
//! Establishments, their categories and products (with option groups), plus the
//! read-only snapshot the pricing engine resolves carts against. Pure domain
//! logic: validation and state changes only, no IO.

pub mod category;
pub mod establishment;
pub mod product;
pub mod snapshot;

pub use category::{Category, CategoryUpdate, NewCategory};
pub use establishment::{
    Establishment, EstablishmentUpdate, NewEstablishment, Presentation, Subscription,
    DEFAULT_THEME_COLOR,
};
pub use product::{NewProduct, OptionGroup, OptionItem, OptionKind, Product, ProductUpdate};
pub use snapshot::CatalogSnapshot;
