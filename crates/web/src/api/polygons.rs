use axum::{
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode},
    routing::{get, on, post},
    Json, Router,
};
use database::{queries, DatabaseError};
use model::polygon::{CreatePolygon, Polygon, UpdatePolygon};
use serde_json::json;

use crate::{
    common::{route_not_found, schema, RouteErrorResponse, METHOD_FILTER_ALL},
    RouteResult, WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Polygon>))
        .route(
            "/:id",
            get(get_polygon).put(update_polygon).delete(delete_polygon),
        )
        .route("/", post(create_polygon).get(get_polygons))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn create_polygon(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { database }): State<WebState>,
    Json(polygon): Json<CreatePolygon>,
) -> RouteResult<(StatusCode, Json<Polygon>)> {
    if polygon.name.trim().is_empty() {
        return Err(
            RouteErrorResponse::bad_request("Polygon name must not be empty")
                .with_method(&Method::POST)
                .with_uri(original_uri.path()),
        );
    }

    let shape_ewkt = polygon.shape.to_ewkt().map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    })?;

    queries::polygon::insert(
        database.pool(),
        &polygon.name,
        &shape_ewkt,
        polygon.population_density,
    )
    .await
    .map(|created| (StatusCode::CREATED, Json(created)))
    .map_err(|why| match why {
        DatabaseError::UniqueViolation => RouteErrorResponse::bad_request(
            "Polygon with this name already exists",
        )
        .with_method(&Method::POST)
        .with_uri(original_uri.path()),
        other => polygon_error(other, &Method::POST, original_uri.path()),
    })
}

async fn get_polygon(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i32>,
    State(WebState { database }): State<WebState>,
) -> RouteResult<Json<Polygon>> {
    queries::polygon::get(database.pool(), id)
        .await
        .map(Json)
        .map_err(|why| polygon_error(why, &Method::GET, original_uri.path()))
}

async fn update_polygon(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i32>,
    State(WebState { database }): State<WebState>,
    Json(changes): Json<UpdatePolygon>,
) -> RouteResult<Json<Polygon>> {
    if changes.is_empty() {
        return Err(RouteErrorResponse::bad_request(
            "At least one field must be provided for update",
        )
        .with_method(&Method::PUT)
        .with_uri(original_uri.path()));
    }

    let shape_ewkt = match &changes.shape {
        Some(shape) => Some(shape.to_ewkt().map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::PUT)
                .with_uri(original_uri.path())
        })?),
        None => None,
    };
    queries::polygon::update(
        database.pool(),
        id,
        changes.name.as_deref(),
        shape_ewkt.as_deref(),
        changes.population_density,
    )
    .await
    .map(Json)
    .map_err(|why| polygon_error(why, &Method::PUT, original_uri.path()))
}

async fn delete_polygon(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i32>,
    State(WebState { database }): State<WebState>,
) -> RouteResult<Json<serde_json::Value>> {
    queries::polygon::delete(database.pool(), id)
        .await
        .map(|_| {
            Json(json!({
                "message": "Polygon deleted successfully"
            }))
        })
        .map_err(|why| polygon_error(why, &Method::DELETE, original_uri.path()))
}

async fn get_polygons(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { database }): State<WebState>,
) -> RouteResult<Json<Vec<Polygon>>> {
    queries::polygon::get_all(database.pool())
        .await
        .map(Json)
        .map_err(|why| polygon_error(why, &Method::GET, original_uri.path()))
}

fn polygon_error(
    why: DatabaseError,
    method: &Method,
    uri: &str,
) -> RouteErrorResponse {
    RouteErrorResponse::from(why)
        .with_not_found_detail("Polygon not found")
        .with_method(method)
        .with_uri(uri)
}
