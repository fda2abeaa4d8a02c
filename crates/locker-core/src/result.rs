//! Convenience result type alias for the document locker.

use crate::error::AppError;

/// A specialized `Result` type for locker operations.
///
/// Every crate returns `AppResult<T>` so errors propagate with `?`
/// without per-crate conversion boilerplate.
pub type AppResult<T> = Result<T, AppError>;
