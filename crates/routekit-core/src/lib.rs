//! # routekit-core
//!
//! Core crate for routekit. Contains the structured [`ErrorResponse`] that
//! every failure path is normalised into, configuration schemas, and the
//! crate-level error type used during start-up.
//!
//! The only framework type this crate touches is axum's `Response`, so the
//! error model can write itself as a terminal JSON body.

pub mod config;
pub mod error;
pub mod response;
pub mod result;

pub use error::AppError;
pub use response::{Aborted, BoxError, ErrorResponse, abort_with_error};
pub use result::AppResult;
