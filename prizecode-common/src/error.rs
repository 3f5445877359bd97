// prizecode-common/src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Transient storage failure. No partial state is ever committed, so the
    /// caller may retry the whole operation with the same arguments.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid code format: {0}")]
    InvalidFormat(String),

    #[error("Code not found: {0}")]
    NotFound(String),

    #[error("Code already redeemed: {0}")]
    AlreadyUsed(String),

    /// A generated code value collided with an existing row. Issuance retries
    /// internally; this only surfaces when the retry budget is exhausted.
    #[error("Code value collision: {0}")]
    UniquenessConflict(String),

    #[error("Invalid prize table: {0}")]
    PrizeTable(String),

    #[error("Timeout error: {0}")]
    Timeout(#[from] tokio::time::error::Elapsed),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}
