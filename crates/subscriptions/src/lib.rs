//! Subscription entitlement.
//!
//! - `gate`: pure predicate deciding whether an establishment may use
//!   catalog-management operations
//! - `plan` / `payment`: what a payment-provider callback does to the stored flags
//! - `reconcile`: explicit expiry step run by a scheduled worker, never by the gate
//! - `checkout`: the payment-provider contract used to obtain a checkout link
//! - `webhook`: signature check for payment-provider callbacks

pub mod checkout;
pub mod gate;
pub mod payment;
pub mod plan;
pub mod reconcile;
pub mod webhook;

pub use checkout::{CheckoutProvider, CheckoutRequest, UpstreamError};
pub use gate::{DenialReason, Entitlement, is_entitled};
pub use payment::{PaymentStatus, apply_payment_status};
pub use plan::Plan;
pub use reconcile::reconcile_expired;
pub use webhook::{SignatureError, sign_webhook_payload, verify_webhook_signature};
