use thiserror::Error;

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Remote database request failed: {0}")]
    RemoteError(#[from] reqwest::Error),

    #[error("Remote database responded with HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("SQL error: {message}")]
    SqlError {
        message: String,
        code: Option<String>,
    },

    #[error("Local database error: {0}")]
    LocalError(#[from] sqlx::Error),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error(transparent)]
    CoreError(#[from] parish_core::error::CoreError),
}

pub type DbResult<T> = std::result::Result<T, DbError>;
