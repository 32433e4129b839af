// Audit record types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One persisted audit entry, serialized as a single JSON line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: Uuid,
    pub ts: DateTime<Utc>,
    pub agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Triage tier for the turn, when one was produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl LogRecord {
    pub fn new(
        agent: impl Into<String>,
        input: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ts: Utc::now(),
            agent: agent.into(),
            patient_id: None,
            input: input.into(),
            intent: None,
            risk: None,
            response: response.into(),
            context: None,
        }
    }

    pub fn with_patient_id(mut self, patient_id: Option<String>) -> Self {
        self.patient_id = patient_id;
        self
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn with_risk(mut self, risk: impl Into<String>) -> Self {
        self.risk = Some(risk.into());
        self
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_omitted_from_wire() {
        let record = LogRecord::new("HelpAgent", "hello", "hi there");
        let line = serde_json::to_string(&record).unwrap();
        assert!(!line.contains("patient_id"));
        assert!(!line.contains("risk"));
        assert!(line.contains("\"agent\":\"HelpAgent\""));
    }

    #[test]
    fn test_populated_fields_serialized() {
        let record = LogRecord::new("FollowUpAgent", "dizzy", "noted")
            .with_patient_id(Some("10004235".to_string()))
            .with_intent("followup")
            .with_risk("ORANGE");
        let line = serde_json::to_string(&record).unwrap();
        assert!(line.contains("\"patient_id\":\"10004235\""));
        assert!(line.contains("\"risk\":\"ORANGE\""));
    }
}
