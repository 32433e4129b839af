use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Policy configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
