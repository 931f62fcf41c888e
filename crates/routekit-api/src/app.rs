//! Installs the pipeline-wide layers on a router.

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::trace::TraceLayer;

use routekit_core::config::AppConfig;

use crate::middleware::logging::request_logging;
use crate::recovery::recovery_with;

/// Wraps every route of `router` with panic recovery, HTTP tracing and
/// request logging.
///
/// Call once per routing pipeline, after all routes are registered. Recovery
/// sits innermost so the logging middleware observes the 500 produced for
/// a panic.
pub fn build_app<S>(router: Router<S>, config: &AppConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(recovery_with(&config.recovery))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(request_logging))
}
