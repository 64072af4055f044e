use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::handlers;
use crate::models::ApiError;
use crate::state::AppState;

/// Build the application router.
///
/// The slide endpoint answers on `/api/slide` and on every other path. Every
/// response, including panics and body-limit rejections, carries
/// `Access-Control-Allow-Origin: *`.
pub fn router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    let endpoint = slide_endpoint();
    Router::new()
        .route("/", endpoint.clone())
        .route("/api/slide", endpoint.clone())
        .route("/{*path}", endpoint)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .with_state(state)
}

// Only POST extracts the body; every other method is answered from the head.
fn slide_endpoint() -> MethodRouter<Arc<AppState>> {
    post(handlers::slide::slide)
        .options(handlers::slide::preflight)
        .fallback(handlers::slide::method_not_allowed)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = detail, "request handler panicked");
    ApiError::Unexpected.into_response()
}
