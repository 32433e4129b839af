//! Per-domain policy configuration
//!
//! One rule per agent domain, loaded once at startup and immutable for
//! the life of the process. The JSON schema is one object per domain:
//! `{ scope: [actions], restrictions: [strings], escalate_on:
//! [conditions], triage_required: bool }`.

use crate::error::{WorkflowError, WorkflowResult};
use intent_router::Intent;
use serde::{Deserialize, Serialize};
use triage_engine::Tier;

/// Business/safety rule scoped to one agent domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Actions the domain handler is allowed to take
    pub scope: Vec<String>,
    pub restrictions: Vec<String>,
    /// Triage tiers that must be surfaced on a dedicated channel
    pub escalate_on: Vec<Tier>,
    pub triage_required: bool,
}

impl PolicyRule {
    pub fn escalates_on(&self, tier: Tier) -> bool {
        self.escalate_on.contains(&tier)
    }
}

/// The full policy set: a closed, total mapping from domain to rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySet {
    pub appointment: PolicyRule,
    pub followup: PolicyRule,
    pub medication: PolicyRule,
    pub caregiver: PolicyRule,
    pub help: PolicyRule,
}

impl PolicySet {
    pub fn for_intent(&self, intent: Intent) -> &PolicyRule {
        match intent {
            Intent::Appointment => &self.appointment,
            Intent::Followup => &self.followup,
            Intent::Medication => &self.medication,
            Intent::Caregiver => &self.caregiver,
            Intent::Help => &self.help,
        }
    }

    /// Load the policy set from a JSON document.
    pub fn from_json(json: &str) -> WorkflowResult<Self> {
        serde_json::from_str(json).map_err(WorkflowError::Serialization)
    }

    /// Load the policy set from a JSON file on disk.
    pub fn from_file(path: &std::path::Path) -> WorkflowResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

impl Default for PolicySet {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(ToString::to_string).collect();
        Self {
            appointment: PolicyRule {
                scope: strings(&["check_status", "schedule_new", "reschedule", "cancel"]),
                restrictions: strings(&["no diagnosis", "no clinical advice"]),
                escalate_on: vec![Tier::Red, Tier::Orange],
                triage_required: true,
            },
            followup: PolicyRule {
                scope: strings(&["record_symptoms", "triage"]),
                restrictions: strings(&["no diagnosis"]),
                escalate_on: vec![Tier::Red, Tier::Orange],
                triage_required: true,
            },
            medication: PolicyRule {
                scope: strings(&["education"]),
                restrictions: strings(&["no dosing changes", "no new prescriptions"]),
                escalate_on: vec![Tier::Red],
                triage_required: false,
            },
            caregiver: PolicyRule {
                scope: strings(&["weekly_summary"]),
                restrictions: strings(&["consent required"]),
                escalate_on: vec![],
                triage_required: false,
            },
            help: PolicyRule {
                scope: strings(&["general_information"]),
                restrictions: vec![],
                escalate_on: vec![],
                triage_required: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_requires_triage_for_clinical_domains() {
        let set = PolicySet::default();
        assert!(set.for_intent(Intent::Appointment).triage_required);
        assert!(set.for_intent(Intent::Followup).triage_required);
        assert!(!set.for_intent(Intent::Caregiver).triage_required);
    }

    #[test]
    fn test_escalation_tiers_per_domain() {
        let set = PolicySet::default();
        assert!(set.followup.escalates_on(Tier::Red));
        assert!(set.followup.escalates_on(Tier::Orange));
        assert!(!set.medication.escalates_on(Tier::Orange));
        assert!(!set.help.escalates_on(Tier::Red));
    }

    #[test]
    fn test_policy_set_round_trips_through_json() {
        let set = PolicySet::default();
        let json = serde_json::to_string(&set).unwrap();
        let loaded = PolicySet::from_json(&json).unwrap();
        assert_eq!(loaded.appointment.scope, set.appointment.scope);
        assert_eq!(loaded.medication.escalate_on, vec![Tier::Red]);
    }

    #[test]
    fn test_malformed_policy_rejected() {
        assert!(PolicySet::from_json("{\"appointment\": {}}").is_err());
    }
}
