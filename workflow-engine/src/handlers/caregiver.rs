//! Caregiver communication domain handler
//!
//! Consent-gated weekly patient summary: 7-day symptom trends,
//! medication adherence, and an overall status for the linked
//! caregiver.

use super::{store_err, HandlerContext};
use crate::turn::{HandlerOutput, Turn};
use error_common::Result;
use patient_directory::{MedicationAdherence, SymptomTrend};
use std::fmt;
use tracing::debug;

const TREND_WINDOW_DAYS: i64 = 7;
const MAX_TRENDS_IN_SUMMARY: usize = 3;

/// Overall patient status in the caregiver update. This is a narrative
/// rating, distinct from the clinical triage tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CareStatus {
    Low,
    Moderate,
    High,
}

impl fmt::Display for CareStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
        })
    }
}

/// Heuristic over the week's average severity and missed doses.
fn score_status(avg_severity: f64, missed: u32) -> CareStatus {
    if avg_severity >= 7.0 || missed >= 3 {
        CareStatus::High
    } else if avg_severity >= 4.0 || missed >= 1 {
        CareStatus::Moderate
    } else {
        CareStatus::Low
    }
}

pub(crate) async fn handle(ctx: &HandlerContext, turn: &Turn) -> Result<HandlerOutput> {
    let Some(patient_id) = turn.patient_id.as_deref() else {
        return Ok(HandlerOutput::text(
            "Please provide an 8-digit patient ID so I can prepare the caregiver update.",
        ));
    };

    let Some(patient) = ctx.directory.get_patient(patient_id).await.map_err(store_err)? else {
        return Ok(HandlerOutput::text(format!(
            "I'm sorry, but I couldn't find any patient records with the ID {patient_id}."
        )));
    };

    // Consent gate: a linked caregiver with consent on file, otherwise
    // the update goes through provider-mediated approval.
    let caregiver = match patient.primary_caregiver_id.as_deref() {
        Some(caregiver_id) => ctx
            .directory
            .get_caregiver(caregiver_id)
            .await
            .map_err(store_err)?,
        None => None,
    };
    let Some(caregiver) = caregiver.filter(|c| c.consent_on_file) else {
        return Ok(HandlerOutput::text(format!(
            "Patient {patient_id} has no linked caregiver with consent on file. I can ask \
             the provider's office to arrange that approval before any updates are shared."
        )));
    };

    let trends = ctx
        .directory
        .get_symptom_trends(patient_id, TREND_WINDOW_DAYS)
        .await
        .map_err(store_err)?;
    let adherence = ctx
        .directory
        .get_medication_adherence(patient_id)
        .await
        .map_err(store_err)?;

    let avg_severity = if trends.is_empty() {
        0.0
    } else {
        trends.iter().filter_map(|t| t.avg_severity).sum::<f64>() / trends.len() as f64
    };
    let status = score_status(avg_severity, adherence.missed);
    debug!(patient_id, status = %status, trend_count = trends.len(), "Caregiver summary built");

    let summary = compose_summary(&patient.name, &caregiver.relationship, &caregiver.name,
        &trends, &adherence, status);
    Ok(HandlerOutput::text(summary))
}

fn compose_summary(
    patient_name: &str,
    caregiver_relationship: &str,
    caregiver_name: &str,
    trends: &[SymptomTrend],
    adherence: &MedicationAdherence,
    status: CareStatus,
) -> String {
    let symptom_text = if trends.is_empty() {
        format!("{patient_name} reported no major symptoms in the last {TREND_WINDOW_DAYS} days.")
    } else {
        let parts: Vec<String> = trends
            .iter()
            .take(MAX_TRENDS_IN_SUMMARY)
            .map(|t| match t.avg_severity {
                Some(avg) => format!("{} {}x (avg severity {avg:.1})", t.symptom, t.frequency),
                None => format!("{} {}x", t.symptom, t.frequency),
            })
            .collect();
        format!(
            "{patient_name} reported {} in the last {TREND_WINDOW_DAYS} days.",
            parts.join(", ")
        )
    };

    let total_doses = adherence.taken + adherence.missed;
    let medication_text = if total_doses > 0 {
        format!(
            " Out of {total_doses} doses, {} were missed.",
            adherence.missed
        )
    } else {
        String::new()
    };

    format!(
        "Caregiver Update for {patient_name} ({caregiver_relationship}: {caregiver_name})\n\
         - {symptom_text}{medication_text} Overall status: {status}.\n\
         Recommendation: Please check in if status is MODERATE or HIGH."
    )
}
