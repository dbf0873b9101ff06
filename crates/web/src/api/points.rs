use axum::{
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode},
    routing::{get, on, post},
    Json, Router,
};
use database::{queries, DatabaseError};
use model::{
    geometry::PointGeometry,
    point::{CreatePoint, Point, UpdatePoint},
};
use serde_json::json;

use crate::{
    common::{route_not_found, schema, RouteErrorResponse, METHOD_FILTER_ALL},
    RouteResult, WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Point>))
        .route(
            "/:id",
            get(get_point).put(update_point).delete(delete_point),
        )
        .route("/", post(create_point).get(get_points))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn create_point(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { database }): State<WebState>,
    Json(point): Json<CreatePoint>,
) -> RouteResult<(StatusCode, Json<Point>)> {
    if point.name.trim().is_empty() {
        return Err(
            RouteErrorResponse::bad_request("Point name must not be empty")
                .with_method(&Method::POST)
                .with_uri(original_uri.path()),
        );
    }

    let location_ewkt = point.location.to_ewkt();
    queries::point::insert(
        database.pool(),
        &point.name,
        &location_ewkt,
        point.description.as_deref(),
    )
    .await
    .map(|created| (StatusCode::CREATED, Json(created)))
    .map_err(|why| point_error(why, &Method::POST, original_uri.path()))
}

async fn get_point(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i32>,
    State(WebState { database }): State<WebState>,
) -> RouteResult<Json<Point>> {
    queries::point::get(database.pool(), id)
        .await
        .map(Json)
        .map_err(|why| point_error(why, &Method::GET, original_uri.path()))
}

async fn update_point(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i32>,
    State(WebState { database }): State<WebState>,
    Json(changes): Json<UpdatePoint>,
) -> RouteResult<Json<Point>> {
    if changes.is_empty() {
        return Err(RouteErrorResponse::bad_request(
            "At least one field must be provided for update",
        )
        .with_method(&Method::PUT)
        .with_uri(original_uri.path()));
    }

    let location_ewkt = changes.location.as_ref().map(PointGeometry::to_ewkt);
    queries::point::update(
        database.pool(),
        id,
        changes.name.as_deref(),
        location_ewkt.as_deref(),
        changes.description.as_deref(),
    )
    .await
    .map(Json)
    .map_err(|why| point_error(why, &Method::PUT, original_uri.path()))
}

async fn delete_point(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i32>,
    State(WebState { database }): State<WebState>,
) -> RouteResult<Json<serde_json::Value>> {
    queries::point::delete(database.pool(), id)
        .await
        .map(|_| {
            Json(json!({
                "message": "Point deleted successfully"
            }))
        })
        .map_err(|why| point_error(why, &Method::DELETE, original_uri.path()))
}

async fn get_points(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { database }): State<WebState>,
) -> RouteResult<Json<Vec<Point>>> {
    queries::point::get_all(database.pool())
        .await
        .map(Json)
        .map_err(|why| point_error(why, &Method::GET, original_uri.path()))
}

fn point_error(why: DatabaseError, method: &Method, uri: &str) -> RouteErrorResponse {
    RouteErrorResponse::from(why)
        .with_not_found_detail("Point not found")
        .with_method(method)
        .with_uri(uri)
}
