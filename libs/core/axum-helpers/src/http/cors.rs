use axum::http::{HeaderValue, Method, header, header::InvalidHeaderValue};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// CORS layer restricted to `allowed_origins`.
///
/// Allows the methods the CRUD API uses plus `Content-Type`/`Accept` headers,
/// with a 1 hour preflight cache. Fails if any origin is not a valid header value.
pub fn create_cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
    let origins = allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600)))
}

/// Allows any origin. Development only.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
