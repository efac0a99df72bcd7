//! Read-only aggregation endpoints

use crate::{
    api::{error::ApiError, routes::AppState},
    models::{
        Doctor, DoctorPatients, DoctorsPatientsReport, NamedRef, Patient, ReportStatistics,
        TreatmentSummary,
    },
};
use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::Json,
};
use std::collections::HashMap;

/// GET /report/doctors_patients
pub async fn doctors_patients(
    State(state): State<AppState>,
) -> Result<Json<DoctorsPatientsReport>, ApiError> {
    let (doctors, patients) = state.db.doctors_with_patients()?;
    Ok(Json(build_doctors_patients_report(doctors, patients)))
}

/// GET /report/treatments/:patient_id
pub async fn treatments_for_patient(
    State(state): State<AppState>,
    patient_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<TreatmentSummary>>, ApiError> {
    let Path(patient_id) = patient_id?;
    let treatments = state.db.treatments_for_patient(patient_id)?;
    Ok(Json(treatments.iter().map(TreatmentSummary::from).collect()))
}

/// Group patients under their doctors in one pass.
///
/// Doctor order and per-doctor patient order follow the input order. Patients
/// whose doctor is not in `doctors` are left out, so `total_patients` always
/// equals the sum of the listed patients.
pub fn build_doctors_patients_report(
    doctors: Vec<Doctor>,
    patients: Vec<Patient>,
) -> DoctorsPatientsReport {
    let mut by_doctor: HashMap<i64, Vec<NamedRef>> = HashMap::with_capacity(doctors.len());
    for patient in &patients {
        by_doctor
            .entry(patient.doctor_id)
            .or_default()
            .push(NamedRef::from(patient));
    }

    let doctors_patients: Vec<DoctorPatients> = doctors
        .iter()
        .map(|doctor| DoctorPatients {
            doctor: NamedRef::from(doctor),
            patients: by_doctor.remove(&doctor.id).unwrap_or_default(),
        })
        .collect();

    let total_patients = doctors_patients.iter().map(|d| d.patients.len()).sum();

    DoctorsPatientsReport {
        statistics: ReportStatistics {
            total_doctors: doctors_patients.len(),
            total_patients,
        },
        doctors_patients,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(id: i64) -> Doctor {
        Doctor {
            id,
            name: format!("Dr {id}"),
        }
    }

    fn patient(id: i64, doctor_id: i64) -> Patient {
        Patient {
            id,
            name: format!("P{id}"),
            doctor_id,
        }
    }

    #[test]
    fn test_groups_patients_by_doctor() {
        let report = build_doctors_patients_report(
            vec![doctor(1), doctor(2), doctor(3)],
            vec![patient(1, 1), patient(2, 2), patient(3, 1)],
        );

        assert_eq!(report.statistics.total_doctors, 3);
        assert_eq!(report.statistics.total_patients, 3);

        let ids: Vec<Vec<i64>> = report
            .doctors_patients
            .iter()
            .map(|d| d.patients.iter().map(|p| p.id).collect())
            .collect();
        assert_eq!(ids, vec![vec![1, 3], vec![2], vec![]]);
    }

    #[test]
    fn test_orphan_patients_excluded_from_totals() {
        let report =
            build_doctors_patients_report(vec![doctor(1)], vec![patient(1, 1), patient(2, 99)]);

        assert_eq!(report.statistics.total_patients, 1);
        let listed: usize = report
            .doctors_patients
            .iter()
            .map(|d| d.patients.len())
            .sum();
        assert_eq!(listed, report.statistics.total_patients);
    }

    #[test]
    fn test_total_matches_listed_for_many_populations() {
        for doctors in 0..5i64 {
            for patients in 0..12i64 {
                let report = build_doctors_patients_report(
                    (1..=doctors).map(doctor).collect(),
                    // Spread patients over doctors 1..=doctors+1 so some dangle
                    (1..=patients)
                        .map(|p| patient(p, p % (doctors + 1) + 1))
                        .collect(),
                );
                let listed: usize = report
                    .doctors_patients
                    .iter()
                    .map(|d| d.patients.len())
                    .sum();
                assert_eq!(report.statistics.total_patients, listed);
                assert_eq!(report.statistics.total_doctors, doctors as usize);
            }
        }
    }

    #[test]
    fn test_empty_population() {
        let report = build_doctors_patients_report(vec![], vec![]);
        assert!(report.doctors_patients.is_empty());
        assert_eq!(report.statistics.total_doctors, 0);
        assert_eq!(report.statistics.total_patients, 0);
    }
}
