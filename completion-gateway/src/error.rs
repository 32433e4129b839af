use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider timed out after {0}s")]
    Timeout(u64),

    #[error("All completion providers exhausted after {attempts} attempts")]
    Exhausted { attempts: usize },

    #[error("Operation not supported by provider: {0}")]
    Unsupported(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;
