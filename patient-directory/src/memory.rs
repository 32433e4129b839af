use crate::directory::PatientDirectory;
use crate::error::DirectoryResult;
use crate::records::{
    AppointmentRecord, AppointmentStatus, CaregiverRecord, MedicationAdherence, Modality,
    PatientContext, PrescriptionRecord, SlotRecord, SymptomLogEntry, SymptomTrend, Urgency,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Store {
    patients: HashMap<String, PatientContext>,
    caregivers: HashMap<String, CaregiverRecord>,
    appointments: Vec<AppointmentRecord>,
    slots: Vec<SlotRecord>,
    prescriptions: Vec<PrescriptionRecord>,
    symptom_logs: Vec<SymptomLogEntry>,
    adherence: HashMap<String, MedicationAdherence>,
}

/// In-memory directory used by tests and the demo CLI
#[derive(Default)]
pub struct InMemoryDirectory {
    inner: RwLock<Store>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small synthetic roster: three patients, one caregiver with
    /// consent on file, upcoming appointments, and open slots.
    pub fn seed_demo() -> Self {
        let now = Utc::now();
        let mut store = Store::default();

        for patient in [
            PatientContext {
                patient_id: "10004235".to_string(),
                name: "Alice Lee".to_string(),
                age: 24,
                language: "ENGLISH".to_string(),
                chronic_conditions: vec![],
                primary_caregiver_id: None,
            },
            PatientContext {
                patient_id: "10000032".to_string(),
                name: "Bob Chen".to_string(),
                age: 54,
                language: "ENGLISH".to_string(),
                chronic_conditions: vec!["Diabetes".to_string()],
                primary_caregiver_id: None,
            },
            PatientContext {
                patient_id: "10001217".to_string(),
                name: "Cara Wong".to_string(),
                age: 17,
                language: "ENGLISH".to_string(),
                chronic_conditions: vec![],
                primary_caregiver_id: Some("C001".to_string()),
            },
        ] {
            store.patients.insert(patient.patient_id.clone(), patient);
        }

        store.caregivers.insert(
            "C001".to_string(),
            CaregiverRecord {
                caregiver_id: "C001".to_string(),
                name: "Wong, Parent".to_string(),
                relationship: "Mother".to_string(),
                consent_on_file: true,
            },
        );

        store.appointments = vec![
            AppointmentRecord {
                appointment_id: 30409,
                patient_id: "10000032".to_string(),
                scheduled_at: now + Duration::days(30),
                appointment_type: "Surgery - Cardiac Bypass".to_string(),
                doctor: "Dr. Smith".to_string(),
                status: AppointmentStatus::Scheduled,
                urgency: Urgency::High,
                can_reschedule: false,
                plan_id: "HMO_A".to_string(),
            },
            AppointmentRecord {
                appointment_id: 30220,
                patient_id: "10004235".to_string(),
                scheduled_at: now + Duration::days(10),
                appointment_type: "Follow-up - Cardiology".to_string(),
                doctor: "Dr. Johnson".to_string(),
                status: AppointmentStatus::Scheduled,
                urgency: Urgency::Medium,
                can_reschedule: true,
                plan_id: "PPO_A".to_string(),
            },
            AppointmentRecord {
                appointment_id: 30384,
                patient_id: "10001217".to_string(),
                scheduled_at: now + Duration::days(5),
                appointment_type: "Consultation - Diabetes".to_string(),
                doctor: "Dr. Wilson".to_string(),
                status: AppointmentStatus::Scheduled,
                urgency: Urgency::Low,
                can_reschedule: true,
                plan_id: "HMO_A".to_string(),
            },
        ];

        store.slots = vec![
            SlotRecord {
                starts_at: now + Duration::days(11),
                doctor: "Dr. Johnson".to_string(),
                appointment_type: "Follow-up - Cardiology".to_string(),
                location: "Clinic A".to_string(),
                modality: Modality::InPerson,
            },
            SlotRecord {
                starts_at: now + Duration::days(12),
                doctor: "Dr. Johnson".to_string(),
                appointment_type: "Follow-up - Cardiology".to_string(),
                location: "Clinic A".to_string(),
                modality: Modality::InPerson,
            },
            SlotRecord {
                starts_at: now + Duration::days(6),
                doctor: "Dr. Wilson".to_string(),
                appointment_type: "Consultation - Diabetes".to_string(),
                location: "Clinic B".to_string(),
                modality: Modality::Video,
            },
        ];

        store.prescriptions = vec![
            PrescriptionRecord {
                patient_id: "10000032".to_string(),
                drug_name: "metformin".to_string(),
                condition: "Type 2 Diabetes".to_string(),
                dosage: "500 mg twice daily".to_string(),
            },
            PrescriptionRecord {
                patient_id: "10004235".to_string(),
                drug_name: "metoprolol".to_string(),
                condition: "Hypertension".to_string(),
                dosage: "25 mg once daily".to_string(),
            },
        ];

        Self {
            inner: RwLock::new(store),
        }
    }

    pub async fn insert_patient(&self, patient: PatientContext) {
        self.inner
            .write()
            .await
            .patients
            .insert(patient.patient_id.clone(), patient);
    }

    pub async fn insert_caregiver(&self, caregiver: CaregiverRecord) {
        self.inner
            .write()
            .await
            .caregivers
            .insert(caregiver.caregiver_id.clone(), caregiver);
    }

    pub async fn insert_appointment(&self, appointment: AppointmentRecord) {
        self.inner.write().await.appointments.push(appointment);
    }

    pub async fn insert_slot(&self, slot: SlotRecord) {
        self.inner.write().await.slots.push(slot);
    }

    pub async fn insert_prescription(&self, prescription: PrescriptionRecord) {
        self.inner.write().await.prescriptions.push(prescription);
    }

    pub async fn insert_symptom_entry(&self, entry: SymptomLogEntry) {
        self.inner.write().await.symptom_logs.push(entry);
    }

    pub async fn set_adherence(&self, patient_id: &str, adherence: MedicationAdherence) {
        self.inner
            .write()
            .await
            .adherence
            .insert(patient_id.to_string(), adherence);
    }
}

#[async_trait]
impl PatientDirectory for InMemoryDirectory {
    async fn get_patient(&self, patient_id: &str) -> DirectoryResult<Option<PatientContext>> {
        Ok(self.inner.read().await.patients.get(patient_id).cloned())
    }

    async fn get_caregiver(&self, caregiver_id: &str) -> DirectoryResult<Option<CaregiverRecord>> {
        Ok(self.inner.read().await.caregivers.get(caregiver_id).cloned())
    }

    async fn get_appointments(&self, patient_id: &str) -> DirectoryResult<Vec<AppointmentRecord>> {
        Ok(self
            .inner
            .read()
            .await
            .appointments
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn get_available_slots(
        &self,
        doctor: &str,
        appointment_type: &str,
    ) -> DirectoryResult<Vec<SlotRecord>> {
        let mut slots: Vec<SlotRecord> = self
            .inner
            .read()
            .await
            .slots
            .iter()
            .filter(|s| s.doctor == doctor && s.appointment_type == appointment_type)
            .cloned()
            .collect();
        slots.sort_by_key(|s| s.starts_at);
        Ok(slots)
    }

    async fn get_prescriptions(
        &self,
        patient_id: &str,
    ) -> DirectoryResult<Vec<PrescriptionRecord>> {
        Ok(self
            .inner
            .read()
            .await
            .prescriptions
            .iter()
            .filter(|p| p.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn get_recent_symptoms(
        &self,
        patient_id: &str,
        days: i64,
    ) -> DirectoryResult<Vec<SymptomLogEntry>> {
        let cutoff = Utc::now() - Duration::days(days);
        Ok(self
            .inner
            .read()
            .await
            .symptom_logs
            .iter()
            .filter(|e| e.patient_id == patient_id && e.recorded_at >= cutoff)
            .cloned()
            .collect())
    }

    async fn get_symptom_history(
        &self,
        patient_id: &str,
        symptom: &str,
        days: i64,
    ) -> DirectoryResult<Vec<SymptomLogEntry>> {
        let cutoff = Utc::now() - Duration::days(days);
        Ok(self
            .inner
            .read()
            .await
            .symptom_logs
            .iter()
            .filter(|e| {
                e.patient_id == patient_id
                    && e.recorded_at >= cutoff
                    && e.symptom.eq_ignore_ascii_case(symptom)
            })
            .cloned()
            .collect())
    }

    async fn record_symptoms(
        &self,
        patient_id: &str,
        symptoms: &[String],
        severity: Option<u8>,
    ) -> DirectoryResult<()> {
        let now = Utc::now();
        let mut store = self.inner.write().await;
        for symptom in symptoms {
            store.symptom_logs.push(SymptomLogEntry {
                patient_id: patient_id.to_string(),
                symptom: symptom.clone(),
                severity,
                recorded_at: now,
                note: String::new(),
            });
        }
        Ok(())
    }

    async fn get_symptom_trends(
        &self,
        patient_id: &str,
        days: i64,
    ) -> DirectoryResult<Vec<SymptomTrend>> {
        let recent = self.get_recent_symptoms(patient_id, days).await?;
        let mut grouped: HashMap<String, (usize, Vec<u8>)> = HashMap::new();
        for entry in recent {
            let slot = grouped.entry(entry.symptom.to_lowercase()).or_default();
            slot.0 += 1;
            if let Some(severity) = entry.severity {
                slot.1.push(severity);
            }
        }
        let mut trends: Vec<SymptomTrend> = grouped
            .into_iter()
            .map(|(symptom, (frequency, severities))| SymptomTrend {
                symptom,
                frequency,
                avg_severity: (!severities.is_empty()).then(|| {
                    f64::from(severities.iter().map(|s| u32::from(*s)).sum::<u32>())
                        / severities.len() as f64
                }),
            })
            .collect();
        trends.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        Ok(trends)
    }

    async fn get_medication_adherence(
        &self,
        patient_id: &str,
    ) -> DirectoryResult<MedicationAdherence> {
        Ok(self
            .inner
            .read()
            .await
            .adherence
            .get(patient_id)
            .copied()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_demo_roster() {
        let dir = InMemoryDirectory::seed_demo();
        let alice = dir.get_patient("10004235").await.unwrap().unwrap();
        assert_eq!(alice.name, "Alice Lee");
        assert!(dir.get_patient("99999999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_symptom_history_respects_window_and_name() {
        let dir = InMemoryDirectory::new();
        let now = Utc::now();
        dir.insert_symptom_entry(SymptomLogEntry {
            patient_id: "10004235".to_string(),
            symptom: "dizziness".to_string(),
            severity: Some(6),
            recorded_at: now - Duration::days(3),
            note: String::new(),
        })
        .await;
        dir.insert_symptom_entry(SymptomLogEntry {
            patient_id: "10004235".to_string(),
            symptom: "dizziness".to_string(),
            severity: Some(4),
            recorded_at: now - Duration::days(10),
            note: String::new(),
        })
        .await;
        dir.insert_symptom_entry(SymptomLogEntry {
            patient_id: "10004235".to_string(),
            symptom: "cough".to_string(),
            severity: None,
            recorded_at: now - Duration::days(1),
            note: String::new(),
        })
        .await;

        let history = dir
            .get_symptom_history("10004235", "Dizziness", 7)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].severity, Some(6));
    }

    #[tokio::test]
    async fn test_record_symptoms_then_trends() {
        let dir = InMemoryDirectory::new();
        dir.record_symptoms("10000032", &["headache".to_string()], Some(4))
            .await
            .unwrap();
        dir.record_symptoms("10000032", &["headache".to_string()], Some(6))
            .await
            .unwrap();
        dir.record_symptoms("10000032", &["nausea".to_string()], None)
            .await
            .unwrap();

        let trends = dir.get_symptom_trends("10000032", 7).await.unwrap();
        assert_eq!(trends[0].symptom, "headache");
        assert_eq!(trends[0].frequency, 2);
        assert_eq!(trends[0].avg_severity, Some(5.0));
        assert_eq!(trends[1].avg_severity, None);
    }

    #[tokio::test]
    async fn test_slots_sorted_soonest_first() {
        let dir = InMemoryDirectory::seed_demo();
        let slots = dir
            .get_available_slots("Dr. Johnson", "Follow-up - Cardiology")
            .await
            .unwrap();
        assert_eq!(slots.len(), 2);
        assert!(slots[0].starts_at <= slots[1].starts_at);
    }
}
