//! # routekit-api
//!
//! Axum adapters that turn every failure in a request pipeline into a single
//! structured JSON body.
//!
//! - [`handler_with_err`] / [`guard_with_err`] map handler errors to
//!   [`ErrorResponse`](routekit_core::ErrorResponse) and abort the request.
//! - [`recovery`] installs the last-resort panic interceptor.
//! - [`get_path_uuid`] reads and validates a UUID path parameter.

pub mod app;
pub mod context;
pub mod extractors;
pub mod handler;
pub mod middleware;
pub mod recovery;

pub use app::build_app;
pub use context::RequestContext;
pub use extractors::path::get_path_uuid;
pub use handler::{guard_with_err, handler_with_err};
pub use recovery::{PanicPayload, RecoveryHandler, panic_with_error, recovery, recovery_with};
