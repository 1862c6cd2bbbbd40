use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use menuboard_catalog::CatalogSnapshot;
use menuboard_core::EstablishmentId;

use crate::app::dto::Items;
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/public-menu/:establishment_id", get(menu_establishment))
        .route("/public-menu/:establishment_id/categories", get(menu_categories))
        .route("/public-menu/:establishment_id/products", get(menu_products))
}

/// Landing read; answers 403 when the establishment is not entitled.
fn load_menu(services: &AppServices, raw_id: &str) -> Result<CatalogSnapshot, axum::response::Response> {
    let id: EstablishmentId = errors::parse_id(raw_id)?;
    services.public_menu(id).map_err(errors::domain_error_to_response)
}

/// Listing reads stay open regardless of subscription; 404 only for unknown establishments.
fn load_catalog(services: &AppServices, raw_id: &str) -> Result<CatalogSnapshot, axum::response::Response> {
    let id: EstablishmentId = errors::parse_id(raw_id)?;
    services.menu_catalog(id).map_err(errors::domain_error_to_response)
}

pub async fn menu_establishment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match load_menu(&services, &id) {
        Ok(menu) => (StatusCode::OK, Json(menu.establishment())).into_response(),
        Err(resp) => resp,
    }
}

pub async fn menu_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match load_catalog(&services, &id) {
        Ok(menu) => (StatusCode::OK, Json(Items::from(menu.visible_categories()))).into_response(),
        Err(resp) => resp,
    }
}

pub async fn menu_products(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match load_catalog(&services, &id) {
        Ok(menu) => (StatusCode::OK, Json(Items::from(menu.visible_products()))).into_response(),
        Err(resp) => resp,
    }
}
