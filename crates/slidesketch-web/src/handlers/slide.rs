use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::models::{self, ApiError};
use crate::state::AppState;

/// `POST`: run the slide extraction on the request body.
pub async fn slide(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return ApiError::Payload(rejection).into_response(),
    };
    let fields = models::parse_request_body(&body);
    let image = fields.get("imageDataUrl").and_then(Value::as_str);

    match slidesketch_core::extract_slide(image, &state.config, state.backend.as_ref()).await {
        Ok(slide) => (StatusCode::OK, Json(slide)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// `OPTIONS`: answer the CORS preflight without reading the body.
pub async fn preflight() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
        ],
    )
        .into_response()
}

/// Any other method. The body is never read.
pub async fn method_not_allowed() -> Response {
    ApiError::MethodNotAllowed.into_response()
}
