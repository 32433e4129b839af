use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audit record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AuditResult<T> = Result<T, AuditError>;
