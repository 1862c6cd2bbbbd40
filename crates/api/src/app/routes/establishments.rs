use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use menuboard_catalog::{EstablishmentUpdate, NewEstablishment};
use menuboard_core::EstablishmentId;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/establishments", post(register_establishment))
        .route(
            "/establishments/:establishment_id",
            get(get_establishment).put(update_establishment),
        )
}

pub async fn register_establishment(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewEstablishment>,
) -> axum::response::Response {
    match services.register_establishment(body) {
        Ok(est) => (StatusCode::CREATED, Json(est)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_establishment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: EstablishmentId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.establishment(id) {
        Ok(est) => (StatusCode::OK, Json(est)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Profile and presentation fields only; subscription state is not client-editable.
pub async fn update_establishment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<EstablishmentUpdate>,
) -> axum::response::Response {
    let id: EstablishmentId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.update_establishment(id, body) {
        Ok(est) => (StatusCode::OK, Json(est)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
