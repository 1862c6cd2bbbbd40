use async_trait::async_trait;
use thiserror::Error;

use menuboard_core::{DomainError, EstablishmentId};

use crate::plan::Plan;

/// A request for a hosted checkout page for one plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub plan: Plan,
    pub establishment_id: EstablishmentId,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("payment provider is not configured")]
    NotConfigured,
    #[error("payment provider request failed: {0}")]
    Transport(String),
    #[error("payment provider rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("payment provider response is missing {0}")]
    MalformedResponse(&'static str),
}

impl From<UpstreamError> for DomainError {
    fn from(err: UpstreamError) -> Self {
        DomainError::upstream(err.to_string())
    }
}

/// Creates a checkout link at the payment provider.
///
/// The provider reports the outcome later through the webhook; implementations
/// only need to return the URL the establishment owner is sent to.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    async fn create_checkout_link(&self, request: &CheckoutRequest) -> Result<String, UpstreamError>;
}

#[async_trait]
impl<P> CheckoutProvider for std::sync::Arc<P>
where
    P: CheckoutProvider + ?Sized,
{
    async fn create_checkout_link(&self, request: &CheckoutRequest) -> Result<String, UpstreamError> {
        (**self).create_checkout_link(request).await
    }
}
