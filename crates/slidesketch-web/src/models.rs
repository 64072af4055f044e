use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};

use slidesketch_core::ExtractError;
use slidesketch_core::slide::decode_object;

/// Message returned for every fault whose details stay server-side.
pub const UNEXPECTED_ERROR: &str = "Unexpected server error";

// ── Request body ────────────────────────────────────────────────────────

/// Decode the inbound body into a JSON object.
///
/// Accepts either a JSON object or a JSON string that itself encodes an
/// object. Anything else (empty, malformed, arrays, scalars) becomes `{}`.
pub fn parse_request_body(body: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(Value::String(inner)) => decode_object(&inner),
        Ok(_) => Map::new(),
        Err(e) => {
            tracing::debug!(error = %e, len = body.len(), "request body is not JSON");
            Map::new()
        }
    }
}

// ── Error responses ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Every way the slide endpoint can refuse a request.
#[derive(Debug)]
pub enum ApiError {
    MethodNotAllowed,
    /// The body could not be read (too large, connection dropped).
    Payload(BytesRejection),
    Extract(ExtractError),
    /// A panic or other fault outside the normal error path.
    Unexpected,
}

impl From<ExtractError> for ApiError {
    fn from(e: ExtractError) -> Self {
        ApiError::Extract(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "POST, OPTIONS")],
                error_json("Use POST"),
            )
                .into_response(),
            ApiError::Payload(rejection) => {
                tracing::warn!(error = %rejection, "failed to read request body");
                (rejection.status(), error_json(rejection.body_text())).into_response()
            }
            ApiError::Extract(e) if e.is_internal() => {
                tracing::error!(error = %e, "slide extraction failed");
                unexpected()
            }
            ApiError::Extract(e) => {
                // Upstream statuses outside the valid range can't be echoed.
                let status =
                    StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
                if status.is_server_error() {
                    tracing::warn!(status = status.as_u16(), error = %e, "slide extraction refused");
                }
                (status, error_json(e.to_string())).into_response()
            }
            ApiError::Unexpected => unexpected(),
        }
    }
}

fn error_json(message: impl Into<String>) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: message.into(),
    })
}

fn unexpected() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, error_json(UNEXPECTED_ERROR)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_body_is_used_directly() {
        let map = parse_request_body(br#"{"imageDataUrl":"data:image/png;base64,AA"}"#);
        assert_eq!(map["imageDataUrl"], "data:image/png;base64,AA");
    }

    #[test]
    fn string_encoded_body_is_decoded_once() {
        let body = serde_json::to_vec(&Value::String(
            r#"{"imageDataUrl":"data:image/png;base64,AA"}"#.into(),
        ))
        .unwrap();
        let map = parse_request_body(&body);
        assert_eq!(map["imageDataUrl"], "data:image/png;base64,AA");
    }

    #[test]
    fn garbage_bodies_become_empty_objects() {
        let bodies: [&[u8]; 6] = [
            b"",
            b"not json",
            b"null",
            b"[1,2,3]",
            b"42",
            b"\"not json either\"",
        ];
        for body in bodies {
            assert!(parse_request_body(body).is_empty());
        }
    }
}
