//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use routekit_core::config::AppConfig;
use routekit_core::config::recovery::RecoveryConfig;
use routekit_core::{Aborted, ErrorResponse};

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Raw body text
    pub text: String,
    /// Whether the response carried the abort marker
    pub aborted: bool,
}

impl TestResponse {
    /// Parses the body as JSON, `Null` if it is not JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or(Value::Null)
    }

    /// Asserts the response is exactly the given structured error.
    pub fn assert_error(&self, expected: &ErrorResponse) {
        assert_eq!(self.status.as_u16(), expected.status(), "body: {}", self.text);

        let actual: ErrorResponse = serde_json::from_str(&self.text)
            .unwrap_or_else(|e| panic!("body is not an ErrorResponse ({e}): {}", self.text));
        assert_eq!(&actual, expected);
        assert!(self.aborted, "error response should be marked aborted");
    }
}

/// Installs the pipeline-wide layers the way an application would.
pub fn app(router: Router) -> Router {
    let config = AppConfig {
        recovery: RecoveryConfig { log_panics: false },
        ..AppConfig::default()
    };
    routekit_api::build_app(router, &config)
}

/// Sends a GET request to the router.
pub async fn get(router: &Router, path: &str) -> TestResponse {
    let req = Request::get(path)
        .body(Body::empty())
        .expect("Failed to build request");
    request(router, req).await
}

/// Sends a GET request with one extra header.
pub async fn get_with_header(
    router: &Router,
    path: &str,
    name: &str,
    value: &str,
) -> TestResponse {
    let req = Request::get(path)
        .header(name, value)
        .body(Body::empty())
        .expect("Failed to build request");
    request(router, req).await
}

async fn request(router: &Router, req: Request<Body>) -> TestResponse {
    let response = router
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let aborted = response.extensions().get::<Aborted>().is_some();
    let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");

    TestResponse {
        status,
        text: String::from_utf8_lossy(&body_bytes).into_owned(),
        aborted,
    }
}
