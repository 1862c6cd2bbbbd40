//! Request/response bodies that are not plain domain types.

use serde::{Deserialize, Serialize};

use menuboard_core::EstablishmentId;
use menuboard_ordering::{CartLine, CustomerContact, Order};
use menuboard_subscriptions::PaymentStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    pub establishment_id: EstablishmentId,
    pub customer: CustomerContact,
    #[serde(default)]
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaceOrderResponse {
    pub order: Order,
    pub whatsapp_url: String,
}

/// `plan` stays a string so unknown plans surface as a validation error.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequestBody {
    pub plan: String,
    pub establishment_id: EstablishmentId,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentNotification {
    pub establishment_id: EstablishmentId,
    pub status: PaymentStatus,
    pub plan: String,
}

/// Envelope for list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct Items<T> {
    pub items: Vec<T>,
}

impl<T> From<Vec<T>> for Items<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}
