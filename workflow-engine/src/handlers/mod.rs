//! Domain handlers, one per resolved intent
//!
//! Dispatch is a closed match over [`Intent`](intent_router::Intent) in
//! the engine; adding a domain means adding a handler module here and a
//! case there. Every handler works with or without gateway access --
//! pure-rule behavior is the resilience baseline -- and returns its
//! user-visible messages as `Ok`, reserving `Err` for genuinely
//! unexpected faults (the engine turns those into an apologetic
//! response).

pub mod appointment;
pub mod caregiver;
pub mod followup;
pub mod help;
pub mod medication;

use crate::policy::PolicySet;
use audit_engine::AuditEngine;
use completion_gateway::CompletionGateway;
use intent_router::Intent;
use patient_directory::PatientDirectory;
use std::sync::Arc;
use triage_engine::TriageEngine;

/// Shared dependencies passed by reference into every handler call
pub struct HandlerContext {
    pub gateway: Option<Arc<CompletionGateway>>,
    pub triage: TriageEngine,
    pub directory: Arc<dyn PatientDirectory>,
    pub audit: Arc<AuditEngine>,
    pub policies: PolicySet,
}

/// Data-store faults map onto the shared pipeline taxonomy; the engine
/// turns them into the apologetic response path.
pub(crate) fn store_err(e: patient_directory::DirectoryError) -> error_common::TurnError {
    error_common::TurnError::Storage(e.to_string())
}

/// Audit `agent` field value for a domain
pub fn agent_name(intent: Intent) -> &'static str {
    match intent {
        Intent::Appointment => "AppointmentAgent",
        Intent::Followup => "FollowUpAgent",
        Intent::Medication => "MedicationEducationAgent",
        Intent::Caregiver => "CaregiverCommunicationAgent",
        Intent::Help => "HelpAgent",
    }
}
