//! Appointment domain handler
//!
//! Structured parse of the request, symptom triage ahead of any
//! scheduling work, policy gates (minors, referral plans), business
//! rules, and alternative-slot suggestions.

use super::{store_err, HandlerContext};
use crate::turn::{HandlerOutput, Turn};
use chrono::{DateTime, Duration, Utc};
use completion_gateway::CompletionRequest;
use error_common::Result;
use patient_directory::{AppointmentRecord, AppointmentStatus, Modality, Urgency};
use serde::Deserialize;
use tracing::debug;

const ACTION_INSTRUCTION: &str = "\
Classify the patient's appointment request into exactly one of: \
check_status | reschedule | cancel | schedule_new | general.\n\
Reply ONLY with JSON like {\"action\": \"check_status\"}.";

/// Plans that require provider approval before scheduling changes
const REFERRAL_REQUIRED_PLANS: &[&str] = &["HMO_A"];

/// Alternative slots are suggested within this horizon
const ALTERNATIVE_WINDOW_DAYS: i64 = 14;
const MAX_ALTERNATIVES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    CheckStatus,
    Reschedule,
    Cancel,
    ScheduleNew,
    General,
}

#[derive(Deserialize)]
struct ActionReply {
    action: String,
}

impl Action {
    fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "check_status" => Self::CheckStatus,
            "reschedule" => Self::Reschedule,
            "cancel" => Self::Cancel,
            "schedule_new" => Self::ScheduleNew,
            _ => Self::General,
        }
    }

    /// Keyword fallback when no completion provider is reachable.
    fn from_keywords(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("cancel") {
            Self::Cancel
        } else if lower.contains("resched") || lower.contains("change my appointment") {
            Self::Reschedule
        } else if lower.contains("check") || lower.contains("status") || lower.contains("confirm") {
            Self::CheckStatus
        } else if lower.contains("new appointment")
            || lower.contains("schedule")
            || lower.contains("book")
        {
            Self::ScheduleNew
        } else {
            Self::General
        }
    }
}

pub(crate) async fn handle(ctx: &HandlerContext, turn: &Turn) -> Result<HandlerOutput> {
    // Clinical signals outrank scheduling: triage runs before any
    // appointment work and RED/ORANGE short-circuit it.
    if ctx.policies.appointment.triage_required {
        let verdict = ctx.triage.evaluate(&turn.text, None, &[]);
        match verdict.tier {
            triage_engine::Tier::Red => {
                return Ok(HandlerOutput::text(
                    "I understand you need to schedule an appointment, but based on the \
                     symptoms you've described, this sounds like it could be serious. Please \
                     go to the nearest emergency department right away. I'm also alerting \
                     the on-call nurse about this.",
                )
                .with_verdict(verdict));
            }
            triage_engine::Tier::Orange => {
                return Ok(HandlerOutput::text(
                    "I hear you'd like to schedule an appointment, and I've also noted the \
                     symptoms you mentioned. Let me have a nurse call you today to discuss \
                     both your symptoms and find the best appointment time. I can also place \
                     a tentative hold for a visit in the next 24 to 48 hours.",
                )
                .with_verdict(verdict));
            }
            triage_engine::Tier::Green => {}
        }
    }

    let Some(patient_id) = turn.patient_id.as_deref() else {
        return Ok(HandlerOutput::text(
            "I'd be happy to help you with your appointment. Could you please provide \
             your 8-digit patient ID so I can look up your information?",
        ));
    };

    let action = parse_action(ctx, &turn.text).await;
    debug!(patient_id, action = ?action, "Appointment request parsed");

    let Some(patient) = ctx.directory.get_patient(patient_id).await.map_err(store_err)? else {
        return Ok(HandlerOutput::text(format!(
            "I'm sorry, but I couldn't find any patient records with the ID {patient_id}. \
             Could you please double-check your patient ID and try again?"
        )));
    };

    let Some(appt) =
        next_scheduled(&ctx.directory.get_appointments(patient_id).await.map_err(store_err)?)
    else {
        return Ok(HandlerOutput::text(format!(
            "Hi {}, I don't see any active appointments scheduled for you at the moment. \
             Would you like me to help you schedule a new appointment?",
            patient.name
        )));
    };

    // Policy gates run before any scheduling action.
    if patient.is_minor() {
        let consent = match patient.primary_caregiver_id.as_deref() {
            Some(caregiver_id) => ctx
                .directory
                .get_caregiver(caregiver_id)
                .await
                .map_err(store_err)?
                .is_some_and(|c| c.consent_on_file),
            None => false,
        };
        if !consent {
            return Ok(HandlerOutput::text(
                "Caregiver consent must be on file before I can make changes for a minor. \
                 I can ask the provider's office to reach out and arrange that approval.",
            ));
        }
    }

    if REFERRAL_REQUIRED_PLANS.contains(&appt.plan_id.as_str())
        && matches!(action, Action::Reschedule | Action::ScheduleNew)
    {
        return Ok(HandlerOutput::text(
            "This request requires provider approval. I can submit that request for you, \
             and the provider's office will contact you to confirm.",
        ));
    }

    let summary = appointment_summary(&appt);
    let response = match action {
        Action::CheckStatus => {
            format!("Great! I can confirm that your {summary} is scheduled and confirmed.")
        }
        Action::Cancel => format!(
            "I can help you cancel your {summary}. Are you sure you'd like to proceed with \
             the cancellation?"
        ),
        Action::Reschedule | Action::ScheduleNew | Action::General => {
            if let Some(reason) = reschedule_block(&appt, Utc::now()) {
                format!(
                    "I understand you'd like to reschedule, but I'm unable to do that right \
                     now because: {reason}"
                )
            } else {
                let alternatives = find_alternatives(ctx, &appt, Utc::now()).await?;
                if alternatives.is_empty() {
                    "I've checked for available slots with this provider in the next two \
                     weeks, and unfortunately there aren't any matching your current \
                     appointment type. Would you like me to check with other providers or \
                     at different locations?"
                        .to_string()
                } else {
                    format!(
                        "I'd be happy to help you reschedule! Here are some available times \
                         that might work for you: {}. Which of these would work best for \
                         your schedule?",
                        alternatives.join(", ")
                    )
                }
            }
        }
    };

    Ok(HandlerOutput::text(response))
}

async fn parse_action(ctx: &HandlerContext, text: &str) -> Action {
    if let Some(gateway) = &ctx.gateway {
        let request = CompletionRequest::new(text).with_system(ACTION_INSTRUCTION);
        if let Ok(raw) = gateway.complete(&request).await {
            if let Ok(reply) = serde_json::from_str::<ActionReply>(raw.trim()) {
                return Action::from_label(&reply.action);
            }
        }
    }
    Action::from_keywords(text)
}

fn next_scheduled(appointments: &[AppointmentRecord]) -> Option<AppointmentRecord> {
    appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Scheduled)
        .min_by_key(|a| a.scheduled_at)
        .cloned()
}

fn appointment_summary(appt: &AppointmentRecord) -> String {
    format!(
        "{} with {} on {}",
        appt.appointment_type,
        appt.doctor,
        appt.scheduled_at.format("%B %d at %I:%M %p")
    )
}

/// Business rules: the reason rescheduling is blocked, if it is.
fn reschedule_block(appt: &AppointmentRecord, now: DateTime<Utc>) -> Option<&'static str> {
    if appt.appointment_type.contains("Surgery") && appt.scheduled_at - now < Duration::hours(48) {
        return Some("Surgery cannot be rescheduled within 48 hours.");
    }
    if appt.urgency == Urgency::High {
        return Some("High-urgency appointments need supervisor approval.");
    }
    if !appt.can_reschedule {
        return Some("This appointment is locked for changes by the provider's office.");
    }
    None
}

/// Open slots with the same doctor and visit type inside the horizon.
async fn find_alternatives(
    ctx: &HandlerContext,
    appt: &AppointmentRecord,
    now: DateTime<Utc>,
) -> Result<Vec<String>> {
    let horizon = now + Duration::days(ALTERNATIVE_WINDOW_DAYS);
    let slots = ctx
        .directory
        .get_available_slots(&appt.doctor, &appt.appointment_type)
        .await
        .map_err(store_err)?;
    Ok(slots
        .iter()
        .filter(|s| s.starts_at >= now && s.starts_at <= horizon)
        .take(MAX_ALTERNATIVES)
        .map(|s| {
            let modality = match s.modality {
                Modality::InPerson => "in person",
                Modality::Video => "video",
            };
            format!(
                "{} ({}, {})",
                s.starts_at.format("%B %d at %I:%M %p"),
                s.location,
                modality
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appt(appointment_type: &str, urgency: Urgency, in_hours: i64) -> AppointmentRecord {
        AppointmentRecord {
            appointment_id: 1,
            patient_id: "10000032".to_string(),
            scheduled_at: Utc::now() + Duration::hours(in_hours),
            appointment_type: appointment_type.to_string(),
            doctor: "Dr. Smith".to_string(),
            status: AppointmentStatus::Scheduled,
            urgency,
            can_reschedule: true,
            plan_id: "PPO_A".to_string(),
        }
    }

    #[test]
    fn test_action_keyword_fallback() {
        assert_eq!(
            Action::from_keywords("can you check my appointment?"),
            Action::CheckStatus
        );
        assert_eq!(
            Action::from_keywords("I need to reschedule my visit"),
            Action::Reschedule
        );
        assert_eq!(
            Action::from_keywords("please cancel my appointment"),
            Action::Cancel
        );
        assert_eq!(
            Action::from_keywords("I'd like to book an appointment"),
            Action::ScheduleNew
        );
        assert_eq!(Action::from_keywords("about my appointment"), Action::General);
    }

    #[test]
    fn test_unknown_action_label_collapses_to_general() {
        assert_eq!(Action::from_label("escalate"), Action::General);
        assert_eq!(Action::from_label("CHECK_STATUS"), Action::CheckStatus);
    }

    #[test]
    fn test_surgery_locked_inside_48_hours() {
        let now = Utc::now();
        let soon = appt("Surgery - Cardiac Bypass", Urgency::Medium, 24);
        assert!(reschedule_block(&soon, now).is_some());

        let far = appt("Surgery - Cardiac Bypass", Urgency::Medium, 24 * 10);
        assert!(reschedule_block(&far, now).is_none());
    }

    #[test]
    fn test_high_urgency_needs_supervisor_approval() {
        let record = appt("Follow-up - Cardiology", Urgency::High, 24 * 10);
        assert_eq!(
            reschedule_block(&record, Utc::now()),
            Some("High-urgency appointments need supervisor approval.")
        );
    }

    #[test]
    fn test_next_scheduled_skips_cancelled() {
        let mut cancelled = appt("Follow-up - Cardiology", Urgency::Low, 24);
        cancelled.status = AppointmentStatus::Cancelled;
        let upcoming = appt("Consultation - Diabetes", Urgency::Low, 72);
        let next = next_scheduled(&[cancelled, upcoming.clone()]).unwrap();
        assert_eq!(next.appointment_type, upcoming.appointment_type);
    }
}
