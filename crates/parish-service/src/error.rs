use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] parish_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] parish_core::error::CoreError),

    /// The named record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// ## Summary
/// Unwraps a lookup, turning `None` into `ServiceError::NotFound(what)`.
///
/// ## Errors
/// Returns `ServiceError::NotFound` when `value` is `None`.
pub fn found<T>(value: Option<T>, what: &'static str) -> ServiceResult<T> {
    value.ok_or(ServiceError::NotFound(what))
}
