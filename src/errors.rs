use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Failures raised at the edges of the statement engine: loading records,
/// storing templates and reading configuration.
#[derive(Debug, Error)]
pub enum StatementError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("transfer `{0}` has no recipient account")]
    MissingRecipient(String),
    #[error("only transfers carry a recipient account (`{0}`)")]
    UnexpectedRecipient(String),
    #[error("template `{title}` has negative amount {amount}")]
    NegativeAmount { title: String, amount: Decimal },
    #[error("template {0} not found")]
    TemplateNotFound(Uuid),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type StatementResult<T> = Result<T, StatementError>;
