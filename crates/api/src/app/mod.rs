//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the operations behind each route, wired to stores and the payment provider
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response bodies that are not plain domain types
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the black-box tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    // Management routes: require an entitled establishment.
    let gated = routes::gated_router().route_layer(axum::middleware::from_fn_with_state(
        services.clone(),
        middleware::subscription_gate,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::public_router().merge(gated))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(Extension(services)),
        )
}

pub use services::AppServices;
