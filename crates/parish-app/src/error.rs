use salvo::http::StatusCode;
use salvo::writing::{Json, Writer};
use salvo::{Depot, Request, Response, async_trait};
use serde::Serialize;
use thiserror::Error;

use parish_core::error::CoreError;
use parish_db::error::DbError;
use parish_service::error::ServiceError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] DbError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    /// The request could not be read: malformed JSON, unknown fields, a bad path or query value.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::ValidationError(_)
        | CoreError::InvalidInput(_)
        | CoreError::PreconditionFailed(_) => StatusCode::BAD_REQUEST,
        CoreError::ConfigError(_) | CoreError::InvariantViolation(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl AppError {
    /// ## Summary
    /// Maps the error onto the status code reported to the client.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::CoreError(err) => core_status(err),
            Self::ServiceError(err) => match err {
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::ValidationError(_) | ServiceError::PreconditionFailed(_) => {
                    StatusCode::BAD_REQUEST
                }
                ServiceError::CoreError(core) => core_status(core),
                ServiceError::DatabaseError(_) | ServiceError::InvalidConfiguration(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[async_trait]
impl Writer for AppError {
    async fn write(self, req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, path = %req.uri().path(), "Request failed");
        } else {
            tracing::debug!(error = %self, %status, "Request rejected");
        }
        res.status_code(status);
        res.render(Json(ErrorResponse {
            detail: self.to_string(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn not_found_maps_to_404() {
        let err = AppError::from(ServiceError::NotFound("Family"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Family not found");
    }

    #[test_log::test]
    fn client_mistakes_map_to_400() {
        let precondition = AppError::from(ServiceError::CoreError(CoreError::PreconditionFailed(
            "start_date must not be after end_date".to_string(),
        )));
        assert_eq!(precondition.status_code(), StatusCode::BAD_REQUEST);

        let validation = AppError::from(CoreError::ValidationError("name".to_string()));
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);

        let body = AppError::BadRequest("unknown field `nickname`".to_string());
        assert_eq!(body.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test_log::test]
    fn storage_failures_map_to_500() {
        let err = AppError::from(ServiceError::DatabaseError(DbError::ProtocolError(
            "unexpected frame".to_string(),
        )));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("unexpected frame"));

        let missing = AppError::from(CoreError::InvariantViolation("Services not found in depot"));
        assert_eq!(missing.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
