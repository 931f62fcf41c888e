//! Panic recovery layer.
//!
//! Normally, if an axum handler panics, the connection is simply dropped.
//! This layer catches the unwind on every exit path of the downstream
//! service, classifies the panic payload, and answers with the same
//! structured JSON body the handler adapters produce.

use std::any::Any;

use axum::body::Body;
use axum::http;
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};

use routekit_core::config::recovery::RecoveryConfig;
use routekit_core::{BoxError, ErrorResponse};

/// Message used when a panic payload carries no usable description.
pub const GENERIC_PANIC_MESSAGE: &str = "internal server error";

/// The recognised shapes of a recovered panic value.
///
/// A panic payload is an untyped `Box<dyn Any>`, so only a payload whose
/// concrete type is exactly `BoxError` is recognised as an error. Panicking
/// with a concrete error type (`panic_any(io::Error::other(..))`) lands in
/// [`PanicPayload::Opaque`]; route such panics through [`panic_with_error`].
#[derive(Debug)]
pub enum PanicPayload {
    /// The handler panicked with an `ErrorResponse`; its status is kept.
    Structured(ErrorResponse),
    /// The handler panicked with a `BoxError`, as [`panic_with_error`] does.
    Error(BoxError),
    /// `panic!("...")` with a literal or formatted message.
    Message(String),
    /// Anything else.
    Opaque,
}

impl PanicPayload {
    /// Classifies a payload as returned by `catch_unwind`.
    pub fn classify(payload: Box<dyn Any + Send + 'static>) -> Self {
        let payload = match payload.downcast::<ErrorResponse>() {
            Ok(structured) => return Self::Structured(*structured),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<BoxError>() {
            Ok(err) => return Self::Error(*err),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<String>() {
            Ok(message) => return Self::Message(*message),
            Err(payload) => payload,
        };
        match payload.downcast::<&'static str>() {
            Ok(message) => Self::Message((*message).to_owned()),
            Err(_) => Self::Opaque,
        }
    }

    /// Short name of the payload shape, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Structured(_) => "structured",
            Self::Error(_) => "error",
            Self::Message(_) => "message",
            Self::Opaque => "opaque",
        }
    }

    /// Converts the payload into the response written to the client.
    pub fn into_error_response(self) -> ErrorResponse {
        match self {
            Self::Structured(structured) => structured,
            Self::Error(err) => ErrorResponse::from_error(err),
            Self::Message(message) => ErrorResponse::server_error(message),
            Self::Opaque => ErrorResponse::server_error(GENERIC_PANIC_MESSAGE),
        }
    }
}

/// Panics with `err` boxed so the recovery layer can read its description.
///
/// This is the only way to panic with a concrete error and have its text
/// reach the client; a bare `panic_any(err)` is answered with the generic
/// message. A wrapped `ErrorResponse` in the error's source chain keeps
/// its status.
pub fn panic_with_error(err: impl Into<BoxError>) -> ! {
    std::panic::panic_any(err.into())
}

/// [`ResponseForPanic`] implementation backing [`recovery`].
#[derive(Debug, Clone, Copy)]
pub struct RecoveryHandler {
    log_panics: bool,
}

impl RecoveryHandler {
    /// Creates a handler from configuration.
    pub fn new(config: &RecoveryConfig) -> Self {
        Self {
            log_panics: config.log_panics,
        }
    }
}

impl Default for RecoveryHandler {
    fn default() -> Self {
        Self::new(&RecoveryConfig::default())
    }
}

impl ResponseForPanic for RecoveryHandler {
    type ResponseBody = Body;

    fn response_for_panic(
        &mut self,
        err: Box<dyn Any + Send + 'static>,
    ) -> http::Response<Self::ResponseBody> {
        let payload = PanicPayload::classify(err);
        let kind = payload.kind();
        let response = payload.into_error_response();

        if self.log_panics {
            tracing::error!(
                kind,
                status = response.status(),
                message = %response.message(),
                "Recovered from panic in request handler"
            );
        }

        response.abort_json()
    }
}

/// Creates the panic recovery layer with default settings.
///
/// Install once per router, e.g. `router.layer(recovery())`.
pub fn recovery() -> CatchPanicLayer<RecoveryHandler> {
    CatchPanicLayer::custom(RecoveryHandler::default())
}

/// Creates the panic recovery layer from configuration.
pub fn recovery_with(config: &RecoveryConfig) -> CatchPanicLayer<RecoveryHandler> {
    CatchPanicLayer::custom(RecoveryHandler::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::panic::catch_unwind;

    fn payload_of(f: impl FnOnce() + std::panic::UnwindSafe) -> Box<dyn Any + Send> {
        catch_unwind(f).expect_err("closure should panic")
    }

    #[test]
    fn test_classify_structured() {
        let payload = payload_of(|| std::panic::panic_any(ErrorResponse::bad_request("bad")));
        let resp = PanicPayload::classify(payload).into_error_response();
        assert_eq!(resp, ErrorResponse::bad_request("bad"));
    }

    #[test]
    fn test_classify_boxed_error() {
        let payload = payload_of(|| panic_with_error(std::io::Error::other("broken pipe")));
        let classified = PanicPayload::classify(payload);
        assert_eq!(classified.kind(), "error");
        assert_eq!(
            classified.into_error_response(),
            ErrorResponse::server_error("broken pipe")
        );
    }

    #[test]
    fn test_classify_boxed_error_wrapping_structured() {
        #[derive(Debug)]
        struct Denied(ErrorResponse);

        impl std::fmt::Display for Denied {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "denied: {}", self.0)
            }
        }

        impl std::error::Error for Denied {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                Some(&self.0)
            }
        }

        let payload = payload_of(|| panic_with_error(Denied(ErrorResponse::forbidden("no"))));
        assert_eq!(
            PanicPayload::classify(payload).into_error_response(),
            ErrorResponse::forbidden("no")
        );
    }

    #[test]
    fn test_classify_unboxed_concrete_error_is_opaque() {
        let payload = payload_of(|| std::panic::panic_any(std::io::Error::other("some error")));
        let classified = PanicPayload::classify(payload);
        assert_eq!(classified.kind(), "opaque");
        assert_eq!(
            classified.into_error_response(),
            ErrorResponse::server_error(GENERIC_PANIC_MESSAGE)
        );
    }

    #[test]
    fn test_classify_static_str_and_formatted_message() {
        let literal = PanicPayload::classify(payload_of(|| panic!("some panic")));
        assert_eq!(
            literal.into_error_response(),
            ErrorResponse::server_error("some panic")
        );

        let code = 7;
        let formatted = PanicPayload::classify(payload_of(move || panic!("code {code}")));
        assert_eq!(
            formatted.into_error_response(),
            ErrorResponse::server_error("code 7")
        );
    }

    #[test]
    fn test_classify_opaque_falls_back_to_generic_message() {
        let payload = payload_of(|| std::panic::panic_any(42_u32));
        let classified = PanicPayload::classify(payload);
        assert_eq!(classified.kind(), "opaque");
        assert_eq!(
            classified.into_error_response(),
            ErrorResponse::server_error(GENERIC_PANIC_MESSAGE)
        );
    }

    #[test]
    fn test_response_for_panic_keeps_structured_status() {
        let mut handler = RecoveryHandler::new(&RecoveryConfig { log_panics: false });
        let response = handler.response_for_panic(Box::new(ErrorResponse::forbidden("no")));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
