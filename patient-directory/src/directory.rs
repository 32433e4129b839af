use crate::error::DirectoryResult;
use crate::records::{
    AppointmentRecord, CaregiverRecord, MedicationAdherence, PatientContext, PrescriptionRecord,
    SlotRecord, SymptomLogEntry, SymptomTrend,
};
use async_trait::async_trait;

/// Read/write interface to the external patient data store
///
/// The store owns the records; the engine borrows them per turn. Every
/// lookup is keyed by record id and misses are `Ok(None)` / empty lists.
#[async_trait]
pub trait PatientDirectory: Send + Sync {
    async fn get_patient(&self, patient_id: &str) -> DirectoryResult<Option<PatientContext>>;

    async fn get_caregiver(&self, caregiver_id: &str) -> DirectoryResult<Option<CaregiverRecord>>;

    async fn get_appointments(&self, patient_id: &str) -> DirectoryResult<Vec<AppointmentRecord>>;

    /// Open slots matching a doctor and visit type, soonest first
    async fn get_available_slots(
        &self,
        doctor: &str,
        appointment_type: &str,
    ) -> DirectoryResult<Vec<SlotRecord>>;

    async fn get_prescriptions(&self, patient_id: &str)
        -> DirectoryResult<Vec<PrescriptionRecord>>;

    /// All symptom reports for a patient within the trailing window
    async fn get_recent_symptoms(
        &self,
        patient_id: &str,
        days: i64,
    ) -> DirectoryResult<Vec<SymptomLogEntry>>;

    /// Reports of one specific symptom within the trailing window
    async fn get_symptom_history(
        &self,
        patient_id: &str,
        symptom: &str,
        days: i64,
    ) -> DirectoryResult<Vec<SymptomLogEntry>>;

    /// Append the current report to the symptom log
    async fn record_symptoms(
        &self,
        patient_id: &str,
        symptoms: &[String],
        severity: Option<u8>,
    ) -> DirectoryResult<()>;

    /// Frequency and average severity per symptom, most frequent first
    async fn get_symptom_trends(
        &self,
        patient_id: &str,
        days: i64,
    ) -> DirectoryResult<Vec<SymptomTrend>>;

    async fn get_medication_adherence(
        &self,
        patient_id: &str,
    ) -> DirectoryResult<MedicationAdherence>;
}
