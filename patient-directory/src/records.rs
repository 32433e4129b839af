use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A patient lookup result, borrowed read-only by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientContext {
    pub patient_id: String,
    pub name: String,
    pub age: u8,
    pub language: String,
    pub chronic_conditions: Vec<String>,
    pub primary_caregiver_id: Option<String>,
}

impl PatientContext {
    pub fn is_minor(&self) -> bool {
        self.age < 18
    }
}

/// A caregiver linked to one or more patients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaregiverRecord {
    pub caregiver_id: String,
    pub name: String,
    pub relationship: String,
    pub consent_on_file: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub appointment_id: u32,
    pub patient_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub appointment_type: String,
    pub doctor: String,
    pub status: AppointmentStatus,
    pub urgency: Urgency,
    pub can_reschedule: bool,
    pub plan_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    InPerson,
    Video,
}

/// An open scheduling slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRecord {
    pub starts_at: DateTime<Utc>,
    pub doctor: String,
    pub appointment_type: String,
    pub location: String,
    pub modality: Modality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionRecord {
    pub patient_id: String,
    pub drug_name: String,
    pub condition: String,
    pub dosage: String,
}

/// One symptom report as stored by the external log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomLogEntry {
    pub patient_id: String,
    pub symptom: String,
    pub severity: Option<u8>,
    pub recorded_at: DateTime<Utc>,
    pub note: String,
}

/// Per-symptom aggregate over a trailing window, for caregiver reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomTrend {
    pub symptom: String,
    pub frequency: usize,
    pub avg_severity: Option<f64>,
}

/// Dose counts over the adherence window
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MedicationAdherence {
    pub taken: u32,
    pub missed: u32,
}
