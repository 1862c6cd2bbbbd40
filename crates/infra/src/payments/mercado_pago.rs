//! Mercado Pago checkout preferences via REST API (no SDK dependency).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use menuboard_subscriptions::{CheckoutProvider, CheckoutRequest, UpstreamError};

pub const DEFAULT_API_URL: &str = "https://api.mercadopago.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct MercadoPagoConfig {
    /// Absent in dev setups; checkout creation then fails with `NotConfigured`.
    pub access_token: Option<String>,
    pub api_url: String,
    /// Whole-request timeout for provider calls.
    pub timeout: Duration,
    /// Base URL the provider redirects the payer back to.
    pub frontend_url: String,
}

#[derive(Debug, Clone)]
pub struct MercadoPagoCheckout {
    client: reqwest::Client,
    config: MercadoPagoConfig,
}

impl MercadoPagoCheckout {
    pub fn new(config: MercadoPagoConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn preferences_url(&self) -> String {
        format!("{}/checkout/preferences", self.config.api_url.trim_end_matches('/'))
    }
}

/// Request body for `POST /checkout/preferences`.
pub fn preference_body(request: &CheckoutRequest, frontend_url: &str) -> Value {
    let plan = request.plan;
    let establishment_id = request.establishment_id.to_string();
    let days = plan.duration().num_days();
    let back_url = |status: &str| {
        format!(
            "{}/payment-status?status={status}&plan={plan}&establishment_id={establishment_id}",
            frontend_url.trim_end_matches('/')
        )
    };

    json!({
        "items": [{
            "id": plan.as_str(),
            "title": plan.title(),
            "description": plan.description(),
            "quantity": 1,
            "currency_id": "BRL",
            "unit_price": plan.price().cents() as f64 / 100.0,
        }],
        "back_urls": {
            "success": back_url("success"),
            "pending": back_url("pending"),
            "failure": back_url("failure"),
        },
        "auto_return": "approved",
        "external_reference": establishment_id,
        "metadata": {
            "establishment_id": establishment_id,
            "plan": plan.as_str(),
            "expiration_days": days,
        },
    })
}

#[async_trait]
impl CheckoutProvider for MercadoPagoCheckout {
    async fn create_checkout_link(&self, request: &CheckoutRequest) -> Result<String, UpstreamError> {
        let token = self
            .config
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(UpstreamError::NotConfigured)?;

        let resp = self
            .client
            .post(self.preferences_url())
            .bearer_auth(token)
            .json(&preference_body(request, &self.config.frontend_url))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::warn!(timeout = ?self.config.timeout, "mercado pago did not answer in time");
                }
                UpstreamError::Transport(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "mercado pago rejected checkout preference");
            return Err(UpstreamError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        body["init_point"]
            .as_str()
            .map(String::from)
            .ok_or(UpstreamError::MalformedResponse("init_point"))
    }
}
