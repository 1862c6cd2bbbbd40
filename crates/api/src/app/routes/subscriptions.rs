use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;

use menuboard_subscriptions::{verify_webhook_signature, webhook::SIGNATURE_HEADER};

use crate::app::dto;
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/subscriptions/checkout", post(create_checkout))
        .route("/subscriptions/webhook", post(payment_webhook))
}

pub async fn create_checkout(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CheckoutRequestBody>,
) -> axum::response::Response {
    match services
        .create_checkout_link(&body.plan, body.establishment_id)
        .await
    {
        Ok(checkout_url) => {
            (StatusCode::OK, Json(dto::CheckoutResponse { checkout_url })).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Payment-provider callback, authenticated by an HMAC signature over the raw body.
///
/// Unsigned or forged callbacks answer 401 without touching state; unknown
/// establishments answer 404.
pub async fn payment_webhook(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let Some(secret) = services.webhook_secret() else {
        tracing::warn!("payment callback refused: webhook secret not configured");
        return errors::json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "webhook_not_configured",
            "payment callbacks are not accepted",
        );
    };

    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    if let Err(e) = verify_webhook_signature(&body, signature, secret, Utc::now()) {
        tracing::warn!(error = %e, "payment callback signature rejected");
        return errors::json_error(StatusCode::UNAUTHORIZED, "invalid_signature", e.to_string());
    }

    let notification: dto::PaymentNotification = match serde_json::from_slice(&body) {
        Ok(n) => n,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string());
        }
    };

    match services.apply_payment(notification.establishment_id, notification.status, &notification.plan) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
