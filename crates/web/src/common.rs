use axum::{
    extract::{OriginalUri, Request},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use database::DatabaseError;
use model::geometry::GeometryError;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

pub type RouteResult<O> = Result<O, RouteErrorResponse>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_uri: Option<String>,

    pub detail: String,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status_code,
            http_method: None,
            requested_uri: None,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    /// The caller never sees the underlying cause; it is logged where the
    /// error is converted.
    pub fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    /// Replaces the detail text of a not-found response, leaving every other
    /// status untouched.
    pub fn with_not_found_detail(mut self, detail: impl Into<String>) -> Self {
        if self.status_code == StatusCode::NOT_FOUND {
            self.detail = detail.into();
        }
        self
    }
}

impl From<DatabaseError> for RouteErrorResponse {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound => {
                Self::not_found("The requested item does not exist.")
            }
            DatabaseError::UniqueViolation => {
                Self::bad_request("An item with this name already exists.")
            }
            DatabaseError::Other(why) => {
                log::error!("database failure: {}", why);
                Self::internal_error()
            }
        }
    }
}

impl From<GeometryError> for RouteErrorResponse {
    fn from(value: GeometryError) -> Self {
        Self::bad_request(format!("Invalid geometry: {}", value))
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}

pub(crate) async fn schema<T: JsonSchema>() -> impl IntoResponse {
    Json(schema_for!(T))
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found("The requested route does not exist.")
        .with_method(req.method())
        .with_uri(original_uri.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::geometry::Geometry;

    #[test]
    fn not_found_maps_to_404() {
        let response = RouteErrorResponse::from(DatabaseError::NotFound);
        assert_eq!(response.status_code, StatusCode::NOT_FOUND);
    }

    #[test]
    fn unique_violation_maps_to_400() {
        let response = RouteErrorResponse::from(DatabaseError::UniqueViolation);
        assert_eq!(response.status_code, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn driver_failure_maps_to_opaque_500() {
        let why = std::io::Error::new(std::io::ErrorKind::Other, "connection refused");
        let response = RouteErrorResponse::from(DatabaseError::other(why));
        assert_eq!(response.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.detail, "Internal server error");
    }

    #[test]
    fn geometry_error_maps_to_400() {
        let why = Geometry::from_ewkt("SRID=3857;POINT(1 2)").unwrap_err();
        let response = RouteErrorResponse::from(why);
        assert_eq!(response.status_code, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_detail_replaces_only_404() {
        let response = RouteErrorResponse::from(DatabaseError::NotFound)
            .with_not_found_detail("Point not found");
        assert_eq!(response.detail, "Point not found");

        let response = RouteErrorResponse::from(DatabaseError::UniqueViolation)
            .with_not_found_detail("Point not found");
        assert_ne!(response.detail, "Point not found");
    }
}
