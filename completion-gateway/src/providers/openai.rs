/// OpenAI chat completions provider
///
/// Also the transcription backend: Whisper is the only audio API in the
/// chain, so `transcribe` falls through to this provider.
use crate::error::{GatewayError, GatewayResult};
use crate::providers::CompletionProvider;
use async_trait::async_trait;
use serde_json::json;

const TRANSCRIPTION_MODEL: &str = "whisper-1";

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            model,
        }
    }

    fn key(&self) -> GatewayResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| GatewayError::Unavailable("OPENAI_API_KEY not set".to_string()))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, system: &str, user: &str, temperature: f32) -> GatewayResult<String> {
        let body = json!({
            "model": self.model,
            "temperature": temperature,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.api_url))
            .bearer_auth(self.key()?)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        payload
            .pointer("/choices/0/message/content")
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                GatewayError::Provider("OpenAI response carried no message content".to_string())
            })
    }

    async fn transcribe(&self, audio: &[u8]) -> GatewayResult<String> {
        let part = reqwest::multipart::Part::bytes(audio.to_vec()).file_name("audio.wav");
        let form = reqwest::multipart::Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/v1/audio/transcriptions", self.api_url))
            .bearer_auth(self.key()?)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        payload
            .get("text")
            .and_then(|t| t.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                GatewayError::Provider("OpenAI transcription carried no text".to_string())
            })
    }
}
