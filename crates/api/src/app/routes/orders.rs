use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use menuboard_core::OrderId;
use menuboard_ordering::OrderUpdate;

use crate::app::dto::{self, Items};
use crate::app::errors;
use crate::app::services::{AppServices, PlaceOrder};
use crate::context::EstablishmentContext;

/// Customer-facing order placement (no subscription gate).
pub fn public_router() -> Router {
    Router::new().route("/orders", post(place_order))
}

pub fn management_router() -> Router {
    Router::new()
        .route("/establishments/:establishment_id/orders", get(list_orders))
        .route(
            "/establishments/:establishment_id/orders/:order_id",
            put(update_order).delete(delete_order),
        )
}

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::PlaceOrderRequest>,
) -> axum::response::Response {
    let request = PlaceOrder {
        establishment_id: body.establishment_id,
        customer: body.customer,
        items: body.items,
        notes: body.notes,
    };

    match services.place_order(request) {
        Ok(placed) => (
            StatusCode::CREATED,
            Json(dto::PlaceOrderResponse {
                order: placed.order,
                whatsapp_url: placed.whatsapp_url,
            }),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Newest first.
pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<EstablishmentContext>,
) -> axum::response::Response {
    let items = services.list_orders(ctx.establishment_id());
    (StatusCode::OK, Json(Items::from(items))).into_response()
}

pub async fn update_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<EstablishmentContext>,
    Path((_, order_id)): Path<(String, String)>,
    Json(body): Json<OrderUpdate>,
) -> axum::response::Response {
    let order_id: OrderId = match errors::parse_id(&order_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.update_order(ctx.establishment_id(), order_id, body) {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<EstablishmentContext>,
    Path((_, order_id)): Path<(String, String)>,
) -> axum::response::Response {
    let order_id: OrderId = match errors::parse_id(&order_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.delete_order(ctx.establishment_id(), order_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
