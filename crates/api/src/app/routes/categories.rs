use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use menuboard_catalog::{CategoryUpdate, NewCategory};
use menuboard_core::CategoryId;

use crate::app::dto::Items;
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::EstablishmentContext;

pub fn router() -> Router {
    Router::new()
        .route(
            "/establishments/:establishment_id/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/establishments/:establishment_id/categories/:category_id",
            put(update_category).delete(delete_category),
        )
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<EstablishmentContext>,
) -> axum::response::Response {
    let items = services.list_categories(ctx.establishment_id());
    (StatusCode::OK, Json(Items::from(items))).into_response()
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<EstablishmentContext>,
    Json(body): Json<NewCategory>,
) -> axum::response::Response {
    match services.create_category(ctx.establishment_id(), body) {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<EstablishmentContext>,
    Path((_, category_id)): Path<(String, String)>,
    Json(body): Json<CategoryUpdate>,
) -> axum::response::Response {
    let category_id: CategoryId = match errors::parse_id(&category_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.update_category(ctx.establishment_id(), category_id, body) {
        Ok(category) => (StatusCode::OK, Json(category)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Also removes every product filed under the category.
pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<EstablishmentContext>,
    Path((_, category_id)): Path<(String, String)>,
) -> axum::response::Response {
    let category_id: CategoryId = match errors::parse_id(&category_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.delete_category(ctx.establishment_id(), category_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
