use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::prompt::CompletionRequest;
use crate::providers::{create_providers, CompletionProvider};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Ordered-fallback completion gateway
///
/// Iterates its provider chain in priority order, skipping providers
/// without credentials and bounding every attempt with a timeout. The
/// first success wins; exhaustion is a typed error callers treat as
/// "no completion available".
pub struct CompletionGateway {
    providers: Vec<Box<dyn CompletionProvider>>,
    request_timeout: Duration,
}

impl CompletionGateway {
    /// Build the gateway from configuration.
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_providers(
            create_providers(config),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Build the gateway over an explicit provider chain. Used by tests
    /// and by callers that assemble non-standard chains.
    pub fn with_providers(
        providers: Vec<Box<dyn CompletionProvider>>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            providers,
            request_timeout,
        }
    }

    /// Names of providers currently holding credentials.
    pub fn available_providers(&self) -> Vec<&str> {
        self.providers
            .iter()
            .filter(|p| p.is_available())
            .map(|p| p.name())
            .collect()
    }

    /// Run a completion through the fallback chain.
    pub async fn complete(&self, request: &CompletionRequest) -> GatewayResult<String> {
        let system = request.system_with_preamble();
        let mut attempts = 0;

        for provider in &self.providers {
            if !provider.is_available() {
                debug!(
                    provider = provider.name(),
                    "Skipping provider without credentials"
                );
                continue;
            }
            attempts += 1;

            match timeout(
                self.request_timeout,
                provider.complete(&system, &request.user, request.temperature),
            )
            .await
            {
                Ok(Ok(text)) => {
                    debug!(provider = provider.name(), "Completion succeeded");
                    return Ok(text);
                }
                Ok(Err(e)) => {
                    warn!(
                        target: "gateway::failures",
                        provider = provider.name(),
                        error = %e,
                        "Provider call failed, advancing to next provider"
                    );
                }
                Err(_) => {
                    warn!(
                        target: "gateway::failures",
                        provider = provider.name(),
                        timeout_secs = self.request_timeout.as_secs(),
                        "Provider attempt timed out, advancing to next provider"
                    );
                }
            }
        }

        Err(GatewayError::Exhausted { attempts })
    }

    /// Transcribe audio through the first provider that supports it.
    pub async fn transcribe(&self, audio: &[u8]) -> GatewayResult<String> {
        let mut attempts = 0;

        for provider in &self.providers {
            if !provider.is_available() {
                continue;
            }
            attempts += 1;

            match timeout(self.request_timeout, provider.transcribe(audio)).await {
                Ok(Ok(text)) => return Ok(text),
                Ok(Err(GatewayError::Unsupported(reason))) => {
                    debug!(provider = provider.name(), reason = %reason, "Provider cannot transcribe");
                }
                Ok(Err(e)) => {
                    warn!(
                        target: "gateway::failures",
                        provider = provider.name(),
                        error = %e,
                        "Transcription failed, advancing to next provider"
                    );
                }
                Err(_) => {
                    warn!(
                        target: "gateway::failures",
                        provider = provider.name(),
                        timeout_secs = self.request_timeout.as_secs(),
                        "Transcription attempt timed out, advancing to next provider"
                    );
                }
            }
        }

        Err(GatewayError::Exhausted { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::SAFETY_PREAMBLE;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct StubProvider {
        name: &'static str,
        available: bool,
        reply: Option<&'static str>,
        delay: Option<Duration>,
        seen_system: Arc<Mutex<Option<String>>>,
    }

    impl StubProvider {
        fn replying(name: &'static str, reply: &'static str) -> Self {
            Self {
                name,
                available: true,
                reply: Some(reply),
                delay: None,
                seen_system: Arc::new(Mutex::new(None)),
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                name,
                available: true,
                reply: None,
                delay: None,
                seen_system: Arc::new(Mutex::new(None)),
            }
        }

        fn without_credentials(name: &'static str) -> Self {
            Self {
                name,
                available: false,
                reply: Some("never returned"),
                delay: None,
                seen_system: Arc::new(Mutex::new(None)),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for StubProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn complete(
            &self,
            system: &str,
            _user: &str,
            _temperature: f32,
        ) -> GatewayResult<String> {
            *self.seen_system.lock().unwrap() = Some(system.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match self.reply {
                Some(reply) => Ok(reply.to_string()),
                None => Err(GatewayError::Provider("stub failure".to_string())),
            }
        }
    }

    fn gateway(providers: Vec<Box<dyn CompletionProvider>>) -> CompletionGateway {
        CompletionGateway::with_providers(providers, Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_first_available_provider_wins() {
        let gw = gateway(vec![
            Box::new(StubProvider::replying("primary", "from primary")),
            Box::new(StubProvider::replying("secondary", "from secondary")),
        ]);
        let text = gw.complete(&CompletionRequest::new("hi")).await.unwrap();
        assert_eq!(text, "from primary");
    }

    #[tokio::test]
    async fn test_chain_skips_providers_without_credentials() {
        let gw = gateway(vec![
            Box::new(StubProvider::without_credentials("primary")),
            Box::new(StubProvider::replying("secondary", "from secondary")),
        ]);
        let text = gw.complete(&CompletionRequest::new("hi")).await.unwrap();
        assert_eq!(text, "from secondary");
    }

    #[tokio::test]
    async fn test_chain_advances_past_failures_in_order() {
        let gw = gateway(vec![
            Box::new(StubProvider::failing("primary")),
            Box::new(StubProvider::failing("secondary")),
            Box::new(StubProvider::replying("tertiary", "third time lucky")),
        ]);
        let text = gw.complete(&CompletionRequest::new("hi")).await.unwrap();
        assert_eq!(text, "third time lucky");
    }

    #[tokio::test]
    async fn test_exhaustion_is_a_typed_error() {
        let gw = gateway(vec![
            Box::new(StubProvider::failing("primary")),
            Box::new(StubProvider::failing("secondary")),
        ]);
        let err = gw.complete(&CompletionRequest::new("hi")).await.unwrap_err();
        match err {
            GatewayError::Exhausted { attempts } => assert_eq!(attempts, 2),
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_provider_times_out_and_chain_advances() {
        let slow = StubProvider {
            name: "slow",
            available: true,
            reply: Some("too late"),
            delay: Some(Duration::from_secs(5)),
            seen_system: Arc::new(Mutex::new(None)),
        };
        let gw = gateway(vec![
            Box::new(slow),
            Box::new(StubProvider::replying("fast", "in time")),
        ]);
        let text = gw.complete(&CompletionRequest::new("hi")).await.unwrap();
        assert_eq!(text, "in time");
    }

    #[tokio::test]
    async fn test_safety_preamble_reaches_every_provider() {
        let stub = StubProvider::replying("primary", "ok");
        let seen = stub.seen_system.clone();
        let gw = gateway(vec![Box::new(stub)]);

        gw.complete(&CompletionRequest::new("hi").with_system("Reply in JSON."))
            .await
            .unwrap();

        let system = seen.lock().unwrap().clone().unwrap();
        assert!(system.starts_with(SAFETY_PREAMBLE));
        assert!(system.contains("Reply in JSON."));
    }

    #[tokio::test]
    async fn test_transcribe_skips_unsupported_providers() {
        struct Transcriber;
        #[async_trait]
        impl CompletionProvider for Transcriber {
            fn name(&self) -> &str {
                "whisper"
            }
            fn is_available(&self) -> bool {
                true
            }
            async fn complete(
                &self,
                _system: &str,
                _user: &str,
                _temperature: f32,
            ) -> GatewayResult<String> {
                Ok("unused".to_string())
            }
            async fn transcribe(&self, _audio: &[u8]) -> GatewayResult<String> {
                Ok("transcribed text".to_string())
            }
        }

        let gw = gateway(vec![
            Box::new(StubProvider::replying("no-audio", "ok")),
            Box::new(Transcriber),
        ]);
        let text = gw.transcribe(b"RIFF....").await.unwrap();
        assert_eq!(text, "transcribed text");
    }
}
