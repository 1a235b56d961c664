//! Convenience result type alias for unpackd.

use crate::error::AppError;

/// A specialized `Result` type for unpackd operations.
pub type AppResult<T> = Result<T, AppError>;
