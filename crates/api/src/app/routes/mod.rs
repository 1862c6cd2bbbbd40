use axum::Router;

pub mod categories;
pub mod establishments;
pub mod orders;
pub mod products;
pub mod public_menu;
pub mod subscriptions;
pub mod system;

/// Endpoints open to anyone: registration, profile, ordering, public menu, payments.
pub fn public_router() -> Router {
    Router::new()
        .merge(establishments::router())
        .merge(orders::public_router())
        .merge(public_menu::router())
        .merge(subscriptions::router())
}

/// Establishment-scoped management endpoints. Every path carries
/// `:establishment_id`; the caller wraps this router in the subscription gate.
pub fn gated_router() -> Router {
    Router::new()
        .merge(categories::router())
        .merge(products::router())
        .merge(orders::management_router())
}
