use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, OrderError>;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("invalid notification kind: expected 'payment'")]
    InvalidNotificationKind,
    #[error("order {0} not found")]
    OrderNotFound(Uuid),
    #[error("payment provider unavailable: {0}")]
    PaymentProviderUnavailable(String),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}
