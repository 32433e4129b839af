use crate::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};

/// Completion provider kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat completions (also the only transcription backend)
    OpenAi,
    /// Anthropic messages API
    Anthropic,
    /// Google Gemini generateContent API
    Google,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
        }
    }
}

/// One configured provider: name, priority rank, and model identifier.
/// Credentials are supplied out-of-band through the environment; a
/// provider without credentials simply drops out of the fallback chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSpec {
    pub kind: ProviderKind,
    pub priority: u32,
    pub model_id: String,
}

/// Gateway configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Providers in fallback order (lowest priority rank first)
    pub providers: Vec<ProviderSpec>,
    /// Per-provider attempt budget in seconds
    pub request_timeout_secs: u64,
    pub openai_api_url: String,
    pub anthropic_api_url: String,
    pub google_api_url: String,
}

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";
const DEFAULT_GOOGLE_MODEL: &str = "gemini-pro";

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// `GATEWAY_PROVIDER_ORDER` is a comma-separated provider list
    /// (default `openai,anthropic,google`); model overrides come from
    /// `OPENAI_MODEL`, `ANTHROPIC_MODEL`, and `GOOGLE_MODEL`.
    pub fn from_env() -> GatewayResult<Self> {
        let order = std::env::var("GATEWAY_PROVIDER_ORDER")
            .unwrap_or_else(|_| "openai,anthropic,google".to_string());

        let request_timeout_secs = std::env::var("GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            providers: Self::parse_order(&order)?,
            request_timeout_secs,
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            anthropic_api_url: std::env::var("ANTHROPIC_API_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
            google_api_url: std::env::var("GOOGLE_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
        })
    }

    /// Parse a comma-separated provider order into prioritized specs.
    pub fn parse_order(order: &str) -> GatewayResult<Vec<ProviderSpec>> {
        let mut providers = Vec::new();
        for (rank, name) in order.split(',').map(str::trim).enumerate() {
            if name.is_empty() {
                continue;
            }
            let kind = match name.to_lowercase().as_str() {
                "openai" => ProviderKind::OpenAi,
                "anthropic" => ProviderKind::Anthropic,
                "google" | "gemini" => ProviderKind::Google,
                other => {
                    return Err(GatewayError::Config(format!(
                        "Unknown completion provider: {other}"
                    )))
                }
            };
            providers.push(ProviderSpec {
                kind,
                priority: u32::try_from(rank).unwrap_or(u32::MAX),
                model_id: default_model_for(kind),
            });
        }
        if providers.is_empty() {
            return Err(GatewayError::Config(
                "provider order resolved to an empty chain".to_string(),
            ));
        }
        providers.sort_by_key(|p| p.priority);
        Ok(providers)
    }
}

fn default_model_for(kind: ProviderKind) -> String {
    match kind {
        ProviderKind::OpenAi => {
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string())
        }
        ProviderKind::Anthropic => {
            std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_ANTHROPIC_MODEL.to_string())
        }
        ProviderKind::Google => {
            std::env::var("GOOGLE_MODEL").unwrap_or_else(|_| DEFAULT_GOOGLE_MODEL.to_string())
        }
    }
}
