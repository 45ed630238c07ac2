use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use shopfront_core::DomainError;
use shopfront_infra::RepositoryError;
use shopfront_products::FieldError;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const ROUTE_NOT_FOUND: &str = "Route not found";
pub const INTERNAL_ERROR: &str = "Internal server error";
pub const PAYLOAD_TOO_LARGE: &str = "Request body too large";

/// Every way a request can fail, mapped to one response shape each.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Declared field rules failed; carries the full ordered list.
    #[error("request validation failed ({} errors)", .0.len())]
    Validation(Vec<FieldError>),

    /// A body that passed the rules still could not be turned into a product.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("product not found")]
    NotFound,

    #[error("route not found")]
    RouteNotFound,

    #[error("request body too large")]
    PayloadTooLarge,

    /// Storage failed. The detail is logged, never returned.
    #[error("storage failure: {0}")]
    Internal(RepositoryError),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Missing(_) => ApiError::NotFound,
            other => ApiError::Internal(other),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound => ApiError::NotFound,
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, axum::Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({ "errors": [{ "msg": msg }] })),
            )
                .into_response(),
            ApiError::NotFound => json_error(StatusCode::NOT_FOUND, PRODUCT_NOT_FOUND),
            ApiError::RouteNotFound => json_error(StatusCode::NOT_FOUND, ROUTE_NOT_FOUND),
            ApiError::PayloadTooLarge => json_error(StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "request failed on storage");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
            }
        }
    }
}

/// `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_core::ProductId;

    #[test]
    fn vanished_rows_become_not_found() {
        let err = ApiError::from(RepositoryError::Missing(ProductId::new(9)));
        assert!(matches!(err, ApiError::NotFound));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_failures_become_internal_errors() {
        let err = ApiError::from(RepositoryError::Unavailable("pool closed".into()));
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unparseable_ids_split_into_bad_request_and_not_found() {
        let err = ApiError::from("abc".parse::<ProductId>().unwrap_err());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from("99999999999999999999".parse::<ProductId>().unwrap_err());
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn domain_validation_becomes_bad_request() {
        let err = ApiError::from(DomainError::validation("price must be greater than 0"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
