use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::{method_not_allowed, not_found};
use crate::http::{cors::cors_layer_from_env, security::security_headers};
use axum::{Router, middleware};
use core_config::{Environment, server::ServerConfig};
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, error, info, warn};
use utoipa::OpenApi;

pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Swagger UI, ReDoc, RapiDoc and Scalar, all rendering `T`.
fn docs_router<T: OpenApi + 'static>() -> Router {
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as _};
    use utoipa_scalar::{Scalar, Servable as _};
    use utoipa_swagger_ui::SwaggerUi;

    let doc = T::openapi();
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_JSON, doc.clone()))
        .merge(Redoc::with_url("/redoc", doc.clone()))
        .merge(RapiDoc::new(OPENAPI_JSON).path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", doc))
}

/// Nests `apis` under `/api` next to the documentation UIs and adds the
/// middleware stack: request tracing, security headers, CORS, compression.
///
/// Unknown paths and methods get a JSON error body. Health endpoints are
/// merged by the binary.
///
/// # Errors
/// Fails when `CORS_ALLOWED_ORIGIN` is invalid, or missing in production.
pub fn create_router<T>(apis: Router, environment: &Environment) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let cors = cors_layer_from_env(environment.is_production())?;
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Ok(docs_router::<T>()
        .nest("/api", apis)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(trace)
        .layer(middleware::from_fn(security_headers))
        .layer(cors)
        .layer(CompressionLayer::new()))
}

/// Serves `router` until SIGINT/SIGTERM, then gives `cleanup` at most
/// `shutdown_timeout` to finish.
///
/// ```ignore
/// let cleanup = async move { mongo_client.shutdown().await };
/// create_production_app(router, &config.server, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(server_config.address()).await?;
    info!(address = %listener.local_addr()?, "Listening");

    let coordinator = ShutdownCoordinator::default();
    let cleanup_task = tokio::spawn(run_cleanup(
        coordinator.clone(),
        shutdown_timeout,
        cleanup,
    ));

    let served = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { coordinator.wait_for_signal().await })
        .await;
    if let Err(e) = &served {
        error!(error = %e, "Server stopped with an error");
    }

    if let Err(e) = cleanup_task.await {
        warn!(error = %e, "Cleanup task panicked");
    }
    served
}

async fn run_cleanup<F>(coordinator: ShutdownCoordinator, timeout: Duration, cleanup: F)
where
    F: Future<Output = ()>,
{
    coordinator.wait_for_signal().await;
    info!(?timeout, "Running cleanup");
    if tokio::time::timeout(timeout, cleanup).await.is_err() {
        warn!(?timeout, "Cleanup timed out");
    } else {
        info!("Cleanup finished");
    }
}
