//! routekit demo server
//!
//! Serves a handful of routes that exercise the error-aware handlers, the
//! UUID path extractor and panic recovery.

mod routes;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use routekit_core::AppResult;
use routekit_core::config::AppConfig;
use routekit_core::config::logging::LoggingConfig;

const CONFIG_ENV: &str = "ROUTEKIT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[tokio::main]
async fn main() -> ExitCode {
    let config_path =
        std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());

    let config = match AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("routekit-demo: cannot load {config_path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging);
    tracing::debug!(path = %config_path, "Configuration loaded");

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Demo server failed");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins over the configured level. Unknown formats fall back to
/// compact single-line output.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match logging.format.as_str() {
        "json" => builder.json().with_current_span(false).init(),
        "pretty" => builder.pretty().init(),
        _ => builder.compact().with_target(false).init(),
    }
}

async fn serve(config: AppConfig) -> AppResult<()> {
    let app = routekit_api::build_app(routes::demo_routes(), &config);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %addr,
        routes = ?routes::ROUTE_TABLE,
        "routekit demo listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(ctrl_c())
        .await?;

    tracing::info!("routekit demo stopped");
    Ok(())
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Ctrl-C received, draining connections"),
        Err(e) => {
            tracing::warn!(error = %e, "Ctrl-C handler unavailable, serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
