use thiserror::Error;

use menuboard_core::{DomainError, EstablishmentId, ProductId};

/// Why a cart could not be priced. Any error rejects the whole order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("cart has no lines")]
    EmptyCart,

    #[error("establishment {0} not found")]
    EstablishmentNotFound(EstablishmentId),

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("line {line}: quantity must be a positive integer (got {quantity})")]
    InvalidQuantity { line: usize, quantity: i64 },

    #[error("order total overflows")]
    Overflow,
}

impl From<PricingError> for DomainError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::EstablishmentNotFound(id) => {
                DomainError::not_found(format!("establishment {id}"))
            }
            PricingError::ProductNotFound(id) => DomainError::not_found(format!("product {id}")),
            PricingError::EmptyCart
            | PricingError::InvalidQuantity { .. }
            | PricingError::Overflow => DomainError::validation(err.to_string()),
        }
    }
}
