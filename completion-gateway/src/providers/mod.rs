pub mod anthropic;
pub mod google;
pub mod openai;

use crate::config::{GatewayConfig, ProviderKind};
use crate::error::{GatewayError, GatewayResult};
use async_trait::async_trait;

/// Trait for completion providers
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Stable provider name for logging and failure reporting
    fn name(&self) -> &str;

    /// Whether credentials for this provider are present; unavailable
    /// providers are skipped by the fallback chain without error
    fn is_available(&self) -> bool;

    /// Run one completion attempt
    async fn complete(&self, system: &str, user: &str, temperature: f32) -> GatewayResult<String>;

    /// Transcribe audio to text; most providers do not support this
    async fn transcribe(&self, _audio: &[u8]) -> GatewayResult<String> {
        Err(GatewayError::Unsupported(format!(
            "{} does not support transcription",
            self.name()
        )))
    }
}

/// Build the provider chain from configuration, in fallback order
pub fn create_providers(config: &GatewayConfig) -> Vec<Box<dyn CompletionProvider>> {
    config
        .providers
        .iter()
        .map(|spec| -> Box<dyn CompletionProvider> {
            match spec.kind {
                ProviderKind::OpenAi => Box::new(openai::OpenAiProvider::new(
                    config.openai_api_url.clone(),
                    spec.model_id.clone(),
                )),
                ProviderKind::Anthropic => Box::new(anthropic::AnthropicProvider::new(
                    config.anthropic_api_url.clone(),
                    spec.model_id.clone(),
                )),
                ProviderKind::Google => Box::new(google::GoogleProvider::new(
                    config.google_api_url.clone(),
                    spec.model_id.clone(),
                )),
            }
        })
        .collect()
}
