use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use menuboard_core::EstablishmentId;
use menuboard_subscriptions::is_entitled;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::EstablishmentContext;

/// Subscription gate for establishment-scoped management routes.
///
/// Reads the `establishment_id` path segment, evaluates entitlement and either
/// answers 403/404 or forwards the request with an [`EstablishmentContext`].
/// Never writes: expiry is reconciled by the background sweeper.
pub async fn subscription_gate(
    State(services): State<Arc<AppServices>>,
    Path(params): Path<HashMap<String, String>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(raw) = params.get("establishment_id") else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "missing establishment id");
    };
    let establishment_id: EstablishmentId = match errors::parse_id(raw) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let establishment = services.establishment(establishment_id).ok();
    if let Err(e) = is_entitled(establishment.as_ref(), Utc::now()).into_result() {
        tracing::info!(%establishment_id, error = %e, "subscription gate denied request");
        return errors::domain_error_to_response(e);
    }

    req.extensions_mut()
        .insert(EstablishmentContext::new(establishment_id));

    next.run(req).await
}

/// One structured log line per request.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let res = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = res.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    res
}
