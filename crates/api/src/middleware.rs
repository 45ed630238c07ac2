use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use shopfront_products::validation::{self, FieldRule, Location, RequestInput};

use crate::app::errors::ApiError;

/// Largest request body the validator will buffer.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Run a route's rule table before its handler.
///
/// All rules are evaluated; any failure short-circuits with 400 and the full
/// ordered error list. On success the request (with its buffered body) is
/// passed on untouched.
///
/// Mount per route with
/// `axum::middleware::from_fn_with_state(rules::CREATE_PRODUCT, validate_request)`.
pub async fn validate_request(
    State(rules): State<&'static [FieldRule]>,
    params: Option<Path<HashMap<String, String>>>,
    request: Request,
    next: Next,
) -> Response {
    let mut input = RequestInput::new();
    if let Some(Path(params)) = params {
        for (name, value) in params {
            input = input.with_param(name, value);
        }
    }

    let request = if rules.iter().any(|rule| rule.location == Location::Body) {
        let (parts, body) = request.into_parts();
        let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, "failed to buffer request body");
                return ApiError::PayloadTooLarge.into_response();
            }
        };
        if is_json_content_type(&parts.headers) {
            if let Ok(body) = serde_json::from_slice::<Value>(&bytes) {
                input = input.with_body(body);
            }
        }
        Request::from_parts(parts, Body::from(bytes))
    } else {
        request
    };

    let errors = validation::validate(rules, &input);
    if !errors.is_empty() {
        tracing::debug!(
            method = %request.method(),
            uri = %request.uri(),
            error_count = errors.len(),
            "request rejected by validation"
        );
        return ApiError::Validation(errors).into_response();
    }

    next.run(request).await
}

/// `application/json` or any `application/*+json` media type.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn recognizes_json_media_types() {
        assert!(is_json_content_type(&headers("application/json")));
        assert!(is_json_content_type(&headers("application/json; charset=utf-8")));
        assert!(is_json_content_type(&headers("Application/JSON")));
        assert!(is_json_content_type(&headers("application/merge-patch+json")));
    }

    #[test]
    fn rejects_other_media_types() {
        assert!(!is_json_content_type(&HeaderMap::new()));
        assert!(!is_json_content_type(&headers("text/plain")));
        assert!(!is_json_content_type(&headers("application/x-www-form-urlencoded")));
    }
}
