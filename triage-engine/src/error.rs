use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Rule configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TriageResult<T> = Result<T, TriageError>;
