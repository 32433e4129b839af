use crate::intent::Intent;
use crate::keywords::classify_keywords;
use crate::patient_id::extract_patient_id;
use completion_gateway::{CompletionGateway, CompletionRequest};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Constrained instruction for the primary classifier. The reply must be
/// a bare JSON object; anything else falls back to keyword rules.
const ROUTING_INSTRUCTION: &str = "\
You are a routing assistant for a healthcare voice triage system. \
Classify the patient message into exactly one of: \
appointment | followup | medication | caregiver | help.\n\
ROUTING RULES:\n\
- If the message reports symptoms or vital signs, answer \"followup\" even when \
scheduling is also mentioned; clinical signals take precedence.\n\
- Scheduling, booking, rescheduling, or checking appointments with no symptoms: \"appointment\".\n\
- Prescription, dosage, or side-effect questions: \"medication\".\n\
- Caregiver summaries or updates about a family member: \"caregiver\".\n\
- Use \"help\" only when none of the above clearly applies.\n\
Reply ONLY with JSON like {\"intent\": \"appointment\"}.";

/// Result of routing one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub intent: Intent,
    pub patient_id: Option<String>,
}

#[derive(Deserialize)]
struct ClassifierReply {
    intent: String,
}

/// Turn classifier: gateway primary, keyword fallback
pub struct IntentRouter {
    gateway: Option<Arc<CompletionGateway>>,
}

impl IntentRouter {
    pub fn new(gateway: Option<Arc<CompletionGateway>>) -> Self {
        Self { gateway }
    }

    /// Resolve the intent and patient id for one turn.
    ///
    /// The id scan runs unconditionally; a previously-known id is kept
    /// when the text carries none. Exactly one intent is always
    /// resolved.
    pub async fn classify(&self, text: &str, known_patient_id: Option<&str>) -> RouteDecision {
        let patient_id =
            extract_patient_id(text).or_else(|| known_patient_id.map(str::to_string));

        let intent = match &self.gateway {
            Some(gateway) => match self.classify_primary(gateway, text).await {
                Some(Intent::Help) => {
                    debug!("Primary classifier uncertain, consulting keyword fallback");
                    classify_keywords(text)
                }
                Some(intent) => intent,
                None => classify_keywords(text),
            },
            None => classify_keywords(text),
        };

        debug!(intent = %intent, patient_id = ?patient_id, "Turn routed");
        RouteDecision { intent, patient_id }
    }

    async fn classify_primary(&self, gateway: &CompletionGateway, text: &str) -> Option<Intent> {
        let request = CompletionRequest::new(text).with_system(ROUTING_INSTRUCTION);
        match gateway.complete(&request).await {
            Ok(raw) => match serde_json::from_str::<ClassifierReply>(raw.trim()) {
                Ok(reply) => Some(Intent::from_label(&reply.intent)),
                Err(e) => {
                    warn!(error = %e, "Primary classifier reply was not valid JSON");
                    None
                }
            },
            Err(e) => {
                warn!(error = %e, "Primary classification failed, using keyword fallback");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use completion_gateway::{CompletionProvider, GatewayError, GatewayResult};
    use std::time::Duration;

    struct CannedProvider {
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl CompletionProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
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
            match self.reply {
                Some(reply) => Ok(reply.to_string()),
                None => Err(GatewayError::Provider("canned failure".to_string())),
            }
        }
    }

    fn gateway_with(reply: Option<&'static str>) -> Arc<CompletionGateway> {
        Arc::new(CompletionGateway::with_providers(
            vec![Box::new(CannedProvider { reply })],
            Duration::from_millis(100),
        ))
    }

    #[tokio::test]
    async fn test_fallback_covers_all_domains_without_gateway() {
        let router = IntentRouter::new(None);
        let cases = [
            ("can you check my appointment?", Intent::Appointment),
            ("I feel dizzy 7/10", Intent::Followup),
            ("what are the side effects of metformin?", Intent::Medication),
            ("send this week's caregiver update", Intent::Caregiver),
            ("hello there", Intent::Help),
        ];
        for (text, expected) in cases {
            let decision = router.classify(text, None).await;
            assert_eq!(decision.intent, expected, "for {text:?}");
        }
    }

    #[tokio::test]
    async fn test_id_scan_runs_regardless_of_intent() {
        let router = IntentRouter::new(None);
        let decision = router.classify("hello, I am patient 10004235", None).await;
        assert_eq!(decision.intent, Intent::Help);
        assert_eq!(decision.patient_id.as_deref(), Some("10004235"));
    }

    #[tokio::test]
    async fn test_known_id_kept_for_continuity() {
        let router = IntentRouter::new(None);
        let decision = router
            .classify("check my appointment", Some("10000032"))
            .await;
        assert_eq!(decision.patient_id.as_deref(), Some("10000032"));
    }

    #[tokio::test]
    async fn test_text_id_wins_over_known_id() {
        let router = IntentRouter::new(None);
        let decision = router
            .classify("I am patient 10004235", Some("10000032"))
            .await;
        assert_eq!(decision.patient_id.as_deref(), Some("10004235"));
    }

    #[tokio::test]
    async fn test_primary_specific_intent_is_respected() {
        let router = IntentRouter::new(Some(gateway_with(Some(
            r#"{"intent": "medication"}"#,
        ))));
        // Keywords alone would say followup; the primary label wins
        // because it is specific.
        let decision = router.classify("I feel dizzy since the change", None).await;
        assert_eq!(decision.intent, Intent::Medication);
    }

    #[tokio::test]
    async fn test_primary_help_triggers_keyword_fallback() {
        let router = IntentRouter::new(Some(gateway_with(Some(r#"{"intent": "help"}"#))));
        let decision = router.classify("I feel dizzy 7/10", None).await;
        assert_eq!(decision.intent, Intent::Followup);
    }

    #[tokio::test]
    async fn test_gateway_failure_triggers_keyword_fallback() {
        let router = IntentRouter::new(Some(gateway_with(None)));
        let decision = router.classify("cancel my appointment", None).await;
        assert_eq!(decision.intent, Intent::Appointment);
    }

    #[tokio::test]
    async fn test_malformed_primary_reply_triggers_keyword_fallback() {
        let router = IntentRouter::new(Some(gateway_with(Some("sure, that sounds medical"))));
        let decision = router.classify("refill my prescription", None).await;
        assert_eq!(decision.intent, Intent::Medication);
    }
}
