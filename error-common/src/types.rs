use thiserror::Error;

/// Recoverable conditions shared across the turn pipeline
#[derive(Error, Debug)]
pub enum TurnError {
    /// Neither the primary classifier nor the rule fallback yielded a
    /// specific domain; the turn is routed to the generic help handler
    #[error("Classification ambiguous: {0}")]
    ClassificationAmbiguous(String),

    /// A completion provider could not be reached or had no credentials
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// A completion provider exceeded its per-attempt time budget
    #[error("Provider timeout: {0}")]
    ProviderTimeout(String),

    /// Malformed or unresolvable patient identifier
    #[error("Invalid patient id: {0}")]
    InvalidPatientId(String),

    /// Caregiver- or minor-related action blocked pending consent
    #[error("Missing consent: {0}")]
    MissingConsent(String),

    /// Audit or data-store write failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for turn pipeline operations
pub type Result<T> = std::result::Result<T, TurnError>;

/// Async logging function for pipeline errors
pub async fn log_error(context: &str, error: &TurnError) {
    tracing::error!(
        context = context,
        error = %error,
        "CareLine error occurred"
    );
}
