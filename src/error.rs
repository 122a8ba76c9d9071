use thiserror::Error;

#[derive(Error, Debug)]
pub enum TickerError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network already watched: {0}")]
    AlreadyWatching(String),

    #[error("Network not watched: {0}")]
    NotWatching(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),
}

impl TickerError {
    pub fn to_error_code(&self) -> &'static str {
        match self {
            TickerError::InvalidInput(_) => "INVALID_INPUT",
            TickerError::AlreadyWatching(_) => "ALREADY_WATCHING",
            TickerError::NotWatching(_) => "NOT_WATCHING",
            TickerError::JsonError(_) => "INVALID_JSON",
            TickerError::DatabaseError(_) => "DATABASE_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, TickerError>;
