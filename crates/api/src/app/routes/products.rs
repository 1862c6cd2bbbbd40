use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use menuboard_catalog::{NewProduct, ProductUpdate};
use menuboard_core::{CategoryId, ProductId};

use crate::app::dto::Items;
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::EstablishmentContext;

pub fn router() -> Router {
    Router::new()
        .route(
            "/establishments/:establishment_id/products",
            get(list_products).post(create_product),
        )
        .route(
            "/establishments/:establishment_id/categories/:category_id/products",
            get(list_category_products),
        )
        .route(
            "/establishments/:establishment_id/products/:product_id",
            put(update_product).delete(delete_product),
        )
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<EstablishmentContext>,
) -> axum::response::Response {
    let items = services.list_products(ctx.establishment_id());
    (StatusCode::OK, Json(Items::from(items))).into_response()
}

pub async fn list_category_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<EstablishmentContext>,
    Path((_, category_id)): Path<(String, String)>,
) -> axum::response::Response {
    let category_id: CategoryId = match errors::parse_id(&category_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.products_in_category(ctx.establishment_id(), category_id) {
        Ok(items) => (StatusCode::OK, Json(Items::from(items))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<EstablishmentContext>,
    Json(body): Json<NewProduct>,
) -> axum::response::Response {
    match services.create_product(ctx.establishment_id(), body) {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<EstablishmentContext>,
    Path((_, product_id)): Path<(String, String)>,
    Json(body): Json<ProductUpdate>,
) -> axum::response::Response {
    let product_id: ProductId = match errors::parse_id(&product_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.update_product(ctx.establishment_id(), product_id, body) {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<EstablishmentContext>,
    Path((_, product_id)): Path<(String, String)>,
) -> axum::response::Response {
    let product_id: ProductId = match errors::parse_id(&product_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.delete_product(ctx.establishment_id(), product_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
