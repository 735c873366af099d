use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Standard envelope for list responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Build a list response with the total number of matching rows in the
/// `X-Total-Count` header, so clients can paginate.
pub fn with_total_count<T: Serialize>(data: T, total_count: i64) -> Response {
    let body = match serde_json::to_string(&ApiResponse { data }) {
        Ok(body) => body,
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(value) = HeaderValue::from_str(&total_count.to_string()) {
        headers.insert("X-Total-Count", value);
    }

    (StatusCode::OK, headers, body).into_response()
}
