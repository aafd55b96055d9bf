use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{create_cors_layer, create_permissive_cors_layer, security_headers};
use axum::{Router, http::StatusCode, middleware};
use core_config::{Environment, server::ServerConfig};
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Upper bound for a single request; slower handlers get 408.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Assemble the application router around `apis`.
///
/// - Swagger UI at `/swagger-ui`, OpenAPI JSON at `/api-docs/openapi.json`
/// - `apis` nested under `/api`
/// - JSON 404 fallback
/// - tracing, request timeout, security headers, CORS, compression
///
/// CORS follows [`ServerConfig::cors_allowed_origins`]. With no origins
/// configured, development allows any origin and production allows none.
///
/// `apis` must already have its state applied; health routes are merged by the
/// caller (see [`health_router`](super::health_router)).
///
/// # Errors
/// Fails when a configured CORS origin is not a valid header value.
pub fn create_router<T>(
    apis: Router,
    server_config: &ServerConfig,
    environment: &Environment,
) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let cors_layer = cors_layer(server_config, environment)?;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

fn cors_layer(server_config: &ServerConfig, environment: &Environment) -> io::Result<CorsLayer> {
    let origins = &server_config.cors_allowed_origins;

    if !origins.is_empty() {
        info!("CORS configured with allowed origins: {}", origins.join(","));
        return create_cors_layer(origins).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        });
    }

    if environment.is_production() {
        warn!("CORS_ALLOWED_ORIGIN not set; cross-origin requests are not allowed");
        Ok(CorsLayer::new())
    } else {
        info!("CORS_ALLOWED_ORIGIN not set; allowing any origin in development");
        Ok(create_permissive_cors_layer())
    }
}

/// Serve `router` until SIGINT/SIGTERM, then run `cleanup` within `shutdown_timeout`.
///
/// In-flight requests are drained before this returns.
///
/// ```ignore
/// create_production_app(router, &config.server, Duration::from_secs(30), async move {
///     db.close().await.ok();
/// })
/// .await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let mut shutdown_rx = coordinator.subscribe();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        // Either the signal arrived or the coordinator was dropped; clean up in both cases.
        let _ = shutdown_rx.recv().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(()) => info!("Cleanup completed successfully"),
            Err(_) => warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let signal_coordinator = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal_coordinator.wait_for_signal().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    // Server stopped for another reason: still release resources.
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct TestDoc;

    fn app(environment: Environment, origins: Vec<String>) -> Router {
        let apis = Router::new().route("/ping", get(|| async { "pong" }));
        let mut config = ServerConfig::default();
        config.cors_allowed_origins = origins;
        create_router::<TestDoc>(apis, &config, &environment).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_routes_nested_under_api() {
        let response = app(Environment::Development, vec![])
            .oneshot(get_request("/api/ping"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-frame-options"], "DENY");
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_404() {
        let response = app(Environment::Development, vec![])
            .oneshot(get_request("/nope"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_openapi_json_served() {
        let response = app(Environment::Production, vec![])
            .oneshot(get_request("/api-docs/openapi.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_invalid_cors_origin_fails() {
        let mut config = ServerConfig::default();
        config.cors_allowed_origins = vec!["bad\norigin".to_string()];
        let result = create_router::<TestDoc>(Router::new(), &config, &Environment::Development);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_configured_origin_is_allowed() {
        let response = app(
            Environment::Production,
            vec!["http://localhost:3000".to_string()],
        )
        .oneshot(
            Request::builder()
                .uri("/api/ping")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );
    }
}
