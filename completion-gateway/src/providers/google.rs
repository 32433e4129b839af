/// Google Gemini generateContent provider
///
/// Gemini has no separate system role on this endpoint; the system
/// instruction and user content are folded into one prompt part.
use crate::error::{GatewayError, GatewayResult};
use crate::providers::CompletionProvider;
use async_trait::async_trait;
use serde_json::json;

pub struct GoogleProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl GoogleProvider {
    pub fn new(api_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key: std::env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty()),
            model,
        }
    }
}

#[async_trait]
impl CompletionProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, system: &str, user: &str, temperature: f32) -> GatewayResult<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GatewayError::Unavailable("GOOGLE_API_KEY not set".to_string()))?;

        let prompt = format!("System: {system}\n\nUser: {user}");
        let body = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] },
            ],
            "generationConfig": { "temperature": temperature },
        });

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.api_url, self.model
            ))
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        payload
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                GatewayError::Provider("Gemini response carried no candidate text".to_string())
            })
    }
}
