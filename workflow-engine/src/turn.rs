use chrono::{DateTime, Utc};
use intent_router::Intent;
use serde::{Deserialize, Serialize};
use triage_engine::{Tier, TriageVerdict};
use uuid::Uuid;

/// One incoming request/response exchange, as submitted by a caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl TurnRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            known_patient_id: None,
            session_id: None,
        }
    }

    pub fn with_patient_id(mut self, patient_id: impl Into<String>) -> Self {
        self.known_patient_id = Some(patient_id.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// What the caller receives back for one turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub response: String,
    pub intent: Intent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triage_tier: Option<Tier>,
}

/// Pipeline position of a turn. Transitions are linear and one-way;
/// a turn never cycles back to an earlier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Start,
    Routed,
    Handled,
    Logged,
    Done,
}

/// What a domain handler produces for one turn
#[derive(Debug, Clone)]
pub struct HandlerOutput {
    pub response: String,
    pub tier: Option<Tier>,
    pub verdict: Option<TriageVerdict>,
}

impl HandlerOutput {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            tier: None,
            verdict: None,
        }
    }

    /// Attach a full triage verdict; the tier is taken from it.
    pub fn with_verdict(mut self, verdict: TriageVerdict) -> Self {
        self.tier = Some(verdict.tier);
        self.verdict = Some(verdict);
        self
    }

    /// Attach a bare tier with no verdict detail (medication risk
    /// scoring produces these).
    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }
}

/// Strongly-typed per-turn accumulator
///
/// Each pipeline stage fills in its fields and advances the state
/// marker; the turn is discarded once the response is extracted, it is
/// never persisted beyond its audit record.
#[derive(Debug, Clone)]
pub struct Turn {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub text: String,
    pub known_patient_id: Option<String>,
    pub session_id: Option<String>,
    pub state: TurnState,
    pub intent: Option<Intent>,
    pub patient_id: Option<String>,
    pub response: Option<String>,
    pub tier: Option<Tier>,
    pub verdict: Option<TriageVerdict>,
    pub failed: bool,
}

impl Turn {
    pub fn new(request: TurnRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            text: request.text,
            known_patient_id: request.known_patient_id,
            session_id: request.session_id,
            state: TurnState::Start,
            intent: None,
            patient_id: None,
            response: None,
            tier: None,
            verdict: None,
            failed: false,
        }
    }

    /// `Start -> Routed`: record the resolved intent and patient id.
    pub fn route(&mut self, intent: Intent, patient_id: Option<String>) {
        self.intent = Some(intent);
        self.patient_id = patient_id;
        self.state = TurnState::Routed;
    }

    /// `Routed -> Handled`: merge the handler's output.
    pub fn handle(&mut self, output: HandlerOutput, failed: bool) {
        self.response = Some(output.response);
        self.tier = output.tier;
        self.verdict = output.verdict;
        self.failed = failed;
        self.state = TurnState::Handled;
    }

    /// `Handled -> Logged`: the audit record has been written.
    pub fn log(&mut self) {
        self.state = TurnState::Logged;
    }

    /// `Logged -> Done`: extract the caller-facing response.
    pub fn into_response(mut self) -> TurnResponse {
        self.state = TurnState::Done;
        TurnResponse {
            response: self
                .response
                .unwrap_or_else(|| "I'm sorry, I couldn't process that request.".to_string()),
            intent: self.intent.unwrap_or(Intent::Help),
            patient_id: self.patient_id,
            triage_tier: self.tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_advances_through_pipeline_states() {
        let mut turn = Turn::new(TurnRequest::new("hello").with_session_id("s1"));
        assert_eq!(turn.state, TurnState::Start);

        turn.route(Intent::Help, None);
        assert_eq!(turn.state, TurnState::Routed);

        turn.handle(HandlerOutput::text("hi there"), false);
        assert_eq!(turn.state, TurnState::Handled);

        turn.log();
        assert_eq!(turn.state, TurnState::Logged);

        let response = turn.into_response();
        assert_eq!(response.response, "hi there");
        assert_eq!(response.intent, Intent::Help);
    }

    #[test]
    fn test_response_wire_format_omits_absent_fields() {
        let mut turn = Turn::new(TurnRequest::new("hello"));
        turn.route(Intent::Help, None);
        turn.handle(HandlerOutput::text("hi"), false);
        turn.log();
        let json = serde_json::to_string(&turn.into_response()).unwrap();
        assert!(!json.contains("patient_id"));
        assert!(!json.contains("triage_tier"));
    }

    #[test]
    fn test_output_tier_follows_verdict() {
        let verdict = triage_engine::TriageEngine::default().evaluate("chest pain", None, &[]);
        let output = HandlerOutput::text("go to the ED").with_verdict(verdict);
        assert_eq!(output.tier, Some(Tier::Red));
    }
}
