//! Convenience result type alias for routekit.

use crate::error::AppError;

/// A specialized `Result` type for start-up and configuration operations.
pub type AppResult<T> = Result<T, AppError>;
