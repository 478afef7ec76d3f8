use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Restricts CORS to `origin` when one is configured, otherwise allows any.
pub fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => base.allow_origin(value),
        Some(Err(_)) => {
            tracing::warn!("CORS_ORIGIN is not a valid header value, allowing any origin");
            base.allow_origin(Any)
        }
        None => base.allow_origin(Any),
    }
}
