use crate::handlers::{self, agent_name, HandlerContext};
use crate::policy::PolicySet;
use crate::turn::{HandlerOutput, Turn, TurnRequest, TurnResponse};
use audit_engine::{AuditEngine, LogRecord};
use completion_gateway::CompletionGateway;
use error_common::{log_error, Result};
use intent_router::{Intent, IntentRouter};
use patient_directory::PatientDirectory;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};
use triage_engine::TriageEngine;

/// Best-effort response when a handler fails; the turn still reaches
/// the audit log with the failure marked.
const APOLOGY: &str = "I'm sorry, I ran into a problem while handling that request. Please \
                       try again in a moment, or contact your care team directly if this is \
                       urgent.";

/// The turn orchestration state machine
///
/// Drives every turn through `Start -> Routed -> Handled -> Logged ->
/// Done`, exactly once, with no cycles. Multi-turn conversations are a
/// sequence of independent turns sharing only the externally-persisted
/// patient id and history. `process` is infallible from the caller's
/// view: router and gateway failures fall back to rules, handler
/// failures produce an apologetic response, and every path writes an
/// audit record.
pub struct WorkflowEngine {
    router: IntentRouter,
    ctx: HandlerContext,
}

impl WorkflowEngine {
    pub fn new(
        gateway: Option<Arc<CompletionGateway>>,
        triage: TriageEngine,
        directory: Arc<dyn PatientDirectory>,
        audit: Arc<AuditEngine>,
        policies: PolicySet,
    ) -> Self {
        Self {
            router: IntentRouter::new(gateway.clone()),
            ctx: HandlerContext {
                gateway,
                triage,
                directory,
                audit,
                policies,
            },
        }
    }

    /// Process one turn through the pipeline.
    pub async fn process(&self, request: TurnRequest) -> TurnResponse {
        let mut turn = Turn::new(request);
        debug!(turn_id = %turn.id, "Turn received");

        // Start -> Routed
        let decision = self
            .router
            .classify(&turn.text, turn.known_patient_id.as_deref())
            .await;
        let intent = decision.intent;
        turn.route(intent, decision.patient_id);

        // Routed -> Handled
        let (output, failed) = match self.dispatch(intent, &turn).await {
            Ok(output) => (output, false),
            Err(e) => {
                log_error("handler", &e).await;
                (HandlerOutput::text(APOLOGY), true)
            }
        };
        turn.handle(output, failed);

        // RED/ORANGE outcomes are designed results, never silent: they
        // surface on a dedicated channel in addition to the response.
        if let Some(tier) = turn.tier {
            if self.ctx.policies.for_intent(intent).escalates_on(tier) {
                warn!(
                    target: "escalations",
                    turn_id = %turn.id,
                    intent = %intent,
                    patient_id = turn.patient_id.as_deref().unwrap_or("unknown"),
                    tier = %tier,
                    "Escalation-tier verdict produced"
                );
            }
        }

        // Handled -> Logged; storage faults stay inside the audit engine.
        self.ctx.audit.record(&self.build_record(&turn));
        turn.log();

        // Logged -> Done
        turn.into_response()
    }

    async fn dispatch(&self, intent: Intent, turn: &Turn) -> Result<HandlerOutput> {
        match intent {
            Intent::Appointment => handlers::appointment::handle(&self.ctx, turn).await,
            Intent::Followup => handlers::followup::handle(&self.ctx, turn).await,
            Intent::Medication => handlers::medication::handle(&self.ctx, turn).await,
            Intent::Caregiver => handlers::caregiver::handle(&self.ctx, turn).await,
            Intent::Help => handlers::help::handle(&self.ctx, turn).await,
        }
    }

    fn build_record(&self, turn: &Turn) -> LogRecord {
        let intent = turn.intent.unwrap_or(Intent::Help);
        let response = turn.response.clone().unwrap_or_default();
        let mut record = LogRecord::new(agent_name(intent), turn.text.clone(), response)
            .with_patient_id(turn.patient_id.clone())
            .with_intent(intent.as_str());
        if let Some(tier) = turn.tier {
            record = record.with_risk(tier.as_str());
        }

        let mut context = serde_json::Map::new();
        if let Some(session_id) = &turn.session_id {
            context.insert("session_id".to_string(), json!(session_id));
        }
        if let Some(verdict) = &turn.verdict {
            context.insert("rule_id".to_string(), json!(verdict.rule_id));
            context.insert("rationale".to_string(), json!(verdict.rationale));
            if verdict.escalated {
                context.insert("escalated".to_string(), json!(true));
            }
        }
        if turn.failed {
            context.insert("failed".to_string(), json!(true));
        }
        if !context.is_empty() {
            record = record.with_context(serde_json::Value::Object(context));
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patient_directory::InMemoryDirectory;

    fn engine(audit: Arc<AuditEngine>) -> WorkflowEngine {
        WorkflowEngine::new(
            None,
            TriageEngine::default(),
            Arc::new(InMemoryDirectory::seed_demo()),
            audit,
            PolicySet::default(),
        )
    }

    #[tokio::test]
    async fn test_every_turn_is_logged_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turns.jsonl");
        let engine = engine(Arc::new(AuditEngine::open(&path).unwrap()));

        engine.process(TurnRequest::new("hello there")).await;
        engine.process(TurnRequest::new("I feel dizzy 7/10")).await;

        let lines: Vec<String> = std::fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        assert_eq!(lines.len(), 2);
        let first: LogRecord = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first.agent, "HelpAgent");
        let second: LogRecord = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second.agent, "FollowUpAgent");
        assert_eq!(second.risk.as_deref(), Some("ORANGE"));
    }

    #[tokio::test]
    async fn test_verdict_detail_reaches_the_audit_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turns.jsonl");
        let engine = engine(Arc::new(AuditEngine::open(&path).unwrap()));

        engine
            .process(TurnRequest::new("I have chest pain").with_session_id("s1"))
            .await;

        let line = std::fs::read_to_string(&path).unwrap();
        let record: LogRecord = serde_json::from_str(line.trim()).unwrap();
        let context = record.context.unwrap();
        assert_eq!(context["rule_id"], "chest_pain");
        assert_eq!(context["session_id"], "s1");
    }
}
