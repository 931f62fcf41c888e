//! Demo routes.

use axum::Router;
use axum::middleware as axum_middleware;
use axum::routing::get;

use routekit_api::{RequestContext, get_path_uuid, guard_with_err, handler_with_err};
use routekit_core::ErrorResponse;

/// Paths served by [`demo_routes`], logged at start-up.
pub const ROUTE_TABLE: [&str; 4] = ["/health", "/items/{id}", "/admin/items/{id}", "/panic"];

/// All demo routes, without the pipeline-wide layers.
pub fn demo_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/items/{id}", get(handler_with_err(get_item)))
        .route(
            "/admin/items/{id}",
            get(handler_with_err(get_item))
                .layer(axum_middleware::from_fn(guard_with_err(require_admin))),
        )
        .route("/panic", get(handler_with_err(deliberate_panic)))
}

/// GET /health
async fn health() -> &'static str {
    "ok"
}

/// GET /items/{id} — echoes the parsed UUID.
async fn get_item(ctx: RequestContext) -> Result<String, ErrorResponse> {
    let id = get_path_uuid(&ctx, "id")?;
    Ok(id.to_string())
}

async fn require_admin(ctx: RequestContext) -> Result<(), ErrorResponse> {
    match ctx.header("x-admin") {
        Some("true") => Ok(()),
        _ => Err(ErrorResponse::forbidden("admin access required")),
    }
}

/// GET /panic
async fn deliberate_panic(_ctx: RequestContext) -> Result<String, ErrorResponse> {
    panic!("deliberate panic from /panic")
}
