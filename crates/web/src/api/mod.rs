use axum::{
    response::IntoResponse,
    routing::{get, on},
    Json, Router,
};
use serde_json::json;

pub mod points;
pub mod polygons;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    WebState,
};

pub fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(index))
        .nest_service("/points", points::routes(state.clone()))
        .nest_service("/polygon", polygons::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to the Spatial Data API"
    }))
}
