use serde::{Deserialize, Serialize};

/// A doctor; owns zero or more patients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
}

/// A patient, owned by exactly one doctor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub doctor_id: i64,
}

/// An assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assistant {
    pub id: i64,
    pub name: String,
}

/// Patient ↔ assistant assignment row (duplicates allowed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientAssistant {
    pub id: i64,
    pub patient_id: i64,
    pub assistant_id: i64,
}

/// A treatment prescribed by a doctor, optionally applied by an assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treatment {
    pub id: i64,
    pub description: String,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub assistant_id: Option<i64>,
}

// ===== Request bodies =====
//
// Every field is optional at the serde level so the handlers can name the
// missing one in a 400 instead of failing inside the extractor.

#[derive(Debug, Default, Deserialize)]
pub struct NewDoctor {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewPatient {
    pub name: Option<String>,
    pub doctor_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewAssistant {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewTreatment {
    pub description: Option<String>,
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub assistant_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewAssignment {
    pub patient_id: Option<i64>,
    pub assistant_id: Option<i64>,
}

// ===== Response shapes =====

/// `{id, name}` view shared by doctors, patients, and assistants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

impl From<&Doctor> for NamedRef {
    fn from(d: &Doctor) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
        }
    }
}

impl From<&Patient> for NamedRef {
    fn from(p: &Patient) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
        }
    }
}

impl From<&Assistant> for NamedRef {
    fn from(a: &Assistant) -> Self {
        Self {
            id: a.id,
            name: a.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentSummary {
    pub id: i64,
    pub description: String,
}

impl From<&Treatment> for TreatmentSummary {
    fn from(t: &Treatment) -> Self {
        Self {
            id: t.id,
            description: t.description.clone(),
        }
    }
}

/// One doctor with their patients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorPatients {
    pub doctor: NamedRef,
    pub patients: Vec<NamedRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStatistics {
    pub total_doctors: usize,
    pub total_patients: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorsPatientsReport {
    pub doctors_patients: Vec<DoctorPatients>,
    pub statistics: ReportStatistics,
}
