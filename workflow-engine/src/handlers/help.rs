//! Generic conversational handler, the routing default

use super::HandlerContext;
use crate::turn::{HandlerOutput, Turn};
use completion_gateway::CompletionRequest;
use error_common::Result;
use tracing::debug;

const SCOPE_INSTRUCTION: &str = "\
You can help with:\n\
- Appointments: scheduling, checking status, rescheduling, canceling\n\
- Symptoms: reporting and monitoring patient symptoms\n\
- Medications: questions about prescriptions, side effects, interactions\n\
- Caregiver summaries: weekly patient summaries for caregivers\n\
Be friendly, concise, and helpful. If the user asks something unrelated \
to healthcare or this system, politely redirect them to how you can help \
with healthcare needs.";

const STATIC_HELP: &str = "\
I can help with appointments, symptoms (follow-up), medications, and caregiver summaries.\n\
Try something like:\n\
- 'I am patient 10004235, check my appointment'\n\
- 'I feel dizzy 7/10'\n\
- 'What are the side effects of metformin?'\n\
- 'Give me this week's caregiver update for 10001217'";

pub(crate) async fn handle(ctx: &HandlerContext, turn: &Turn) -> Result<HandlerOutput> {
    if let Some(gateway) = &ctx.gateway {
        let request = CompletionRequest::new(&turn.text)
            .with_system(SCOPE_INSTRUCTION)
            .with_temperature(0.7);
        match gateway.complete(&request).await {
            Ok(text) => return Ok(HandlerOutput::text(text)),
            Err(e) => debug!(error = %e, "Help completion unavailable, using static help text"),
        }
    }
    Ok(HandlerOutput::text(STATIC_HELP))
}

#[cfg(test)]
mod tests {
    use super::STATIC_HELP;

    #[test]
    fn test_static_help_lists_every_domain() {
        for topic in ["appointments", "follow-up", "medications", "caregiver"] {
            assert!(STATIC_HELP.contains(topic), "missing {topic}");
        }
    }
}
