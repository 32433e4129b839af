/// Anthropic messages API provider
use crate::error::{GatewayError, GatewayResult};
use crate::providers::CompletionProvider;
use async_trait::async_trait;
use serde_json::json;

const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

pub struct AnthropicProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl AnthropicProvider {
    pub fn new(api_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            model,
        }
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, system: &str, user: &str, temperature: f32) -> GatewayResult<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GatewayError::Unavailable("ANTHROPIC_API_KEY not set".to_string()))?;

        let body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "temperature": temperature,
            "system": system,
            "messages": [
                { "role": "user", "content": user },
            ],
        });

        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_url))
            .header("x-api-key", key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        payload
            .pointer("/content/0/text")
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                GatewayError::Provider("Anthropic response carried no text content".to_string())
            })
    }
}
