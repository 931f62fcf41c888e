//! Error-aware handler adapters.
//!
//! Handlers written against these adapters return `Result`. On `Err` the
//! error is normalised with [`ErrorResponse::from_error`], written as the
//! terminal JSON response, and nothing further runs for the request.

use std::future::Future;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;

use routekit_core::{BoxError, ErrorResponse};

use crate::context::RequestContext;

/// Wraps a fallible handler into an axum handler.
///
/// ```ignore
/// Router::new().route(
///     "/items/{id}",
///     get(handler_with_err(|ctx: RequestContext| async move {
///         let id = get_path_uuid(&ctx, "id")?;
///         Ok::<_, ErrorResponse>(id.to_string())
///     })),
/// );
/// ```
///
/// An `Ok` response is returned as-is. An `Err` that is an `ErrorResponse`
/// keeps its status; any other error becomes a 500 with its `Display` text.
pub fn handler_with_err<F, Fut, R, E>(
    handler: F,
) -> impl Fn(RequestContext) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static
where
    F: Fn(RequestContext) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: IntoResponse,
    E: Into<BoxError>,
{
    move |ctx: RequestContext| -> BoxFuture<'static, Response> {
        let fut = handler(ctx);
        Box::pin(async move {
            match fut.await {
                Ok(response) => response.into_response(),
                Err(err) => ErrorResponse::from_error(err.into()).abort_json(),
            }
        })
    }
}

/// Middleware form of [`handler_with_err`], for use with
/// [`axum::middleware::from_fn`].
///
/// `check` runs before the downstream chain. `Ok(())` lets the request
/// through; `Err` aborts it and the downstream handler is never invoked.
pub fn guard_with_err<F, Fut, E>(
    check: F,
) -> impl Fn(RequestContext, Request, Next) -> BoxFuture<'static, Response>
+ Clone
+ Send
+ Sync
+ 'static
where
    F: Fn(RequestContext) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<BoxError>,
{
    move |ctx: RequestContext, request: Request, next: Next| -> BoxFuture<'static, Response> {
        let verdict = check(ctx);
        Box::pin(async move {
            let verdict: Result<(), BoxError> = verdict.await.map_err(Into::into);
            match verdict {
                Ok(()) => next.run(request).await,
                Err(err) => ErrorResponse::from_error(err).abort_json(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use routekit_core::Aborted;

    #[tokio::test]
    async fn test_ok_response_is_not_aborted() {
        let handler = handler_with_err(|_ctx: RequestContext| async {
            Ok::<_, ErrorResponse>((StatusCode::CREATED, "made"))
        });

        let response = handler(RequestContext::with_params(&[])).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.extensions().get::<Aborted>().is_none());
    }

    #[tokio::test]
    async fn test_structured_error_keeps_status() {
        let handler = handler_with_err(|_ctx: RequestContext| async {
            Err::<(), _>(ErrorResponse::not_found("gone"))
        });

        let response = handler(RequestContext::with_params(&[])).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<Aborted>().is_some());
    }

    #[tokio::test]
    async fn test_plain_error_becomes_server_error() {
        let handler = handler_with_err(|_ctx: RequestContext| async {
            Err::<(), _>(std::io::Error::other("socket closed"))
        });

        let response = handler(RequestContext::with_params(&[])).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
