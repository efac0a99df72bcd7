//! Doctor, patient, assistant, treatment, and assignment handlers

use crate::{
    api::{
        error::{required_id, required_text, ApiError},
        routes::AppState,
    },
    models::{
        Assistant, Doctor, NamedRef, NewAssignment, NewAssistant, NewDoctor, NewPatient,
        NewTreatment, Patient, TreatmentSummary,
    },
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use tracing::info;

type Created = (StatusCode, Json<Value>);

// ===== Doctors =====

pub async fn create_doctor(
    State(state): State<AppState>,
    payload: Result<Json<NewDoctor>, JsonRejection>,
) -> Result<Created, ApiError> {
    let Json(body) = payload?;
    let name = required_text(body.name, "name")?;

    let doctor = state.db.create_doctor(&name)?;
    info!(id = doctor.id, "Doctor created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Doctor ok", "doctor": NamedRef::from(&doctor) })),
    ))
}

pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Vec<Doctor>>, ApiError> {
    Ok(Json(state.db.list_doctors()?))
}

pub async fn get_doctor(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Doctor>, ApiError> {
    let Path(id) = id?;
    state
        .db
        .get_doctor(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Doctor {} not found", id)))
}

// ===== Patients =====

pub async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<NewPatient>, JsonRejection>,
) -> Result<Created, ApiError> {
    let Json(body) = payload?;
    let name = required_text(body.name, "name")?;
    let doctor_id = required_id(body.doctor_id, "doctor_id")?;

    let patient = state.db.create_patient(&name, doctor_id)?;
    info!(id = patient.id, doctor_id, "Patient created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Patient ok", "patient": NamedRef::from(&patient) })),
    ))
}

pub async fn get_patient(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Patient>, ApiError> {
    let Path(id) = id?;
    state
        .db
        .get_patient(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Patient {} not found", id)))
}

// ===== Assistants =====

pub async fn create_assistant(
    State(state): State<AppState>,
    payload: Result<Json<NewAssistant>, JsonRejection>,
) -> Result<Created, ApiError> {
    let Json(body) = payload?;
    let name = required_text(body.name, "name")?;

    let assistant = state.db.create_assistant(&name)?;
    info!(id = assistant.id, "Assistant created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Assistant ok", "assistant": NamedRef::from(&assistant) })),
    ))
}

pub async fn get_assistant(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Assistant>, ApiError> {
    let Path(id) = id?;
    state
        .db
        .get_assistant(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Assistant {} not found", id)))
}

// ===== Treatments =====

pub async fn create_treatment(
    State(state): State<AppState>,
    payload: Result<Json<NewTreatment>, JsonRejection>,
) -> Result<Created, ApiError> {
    let Json(body) = payload?;
    let description = required_text(body.description, "description")?;
    let patient_id = required_id(body.patient_id, "patient_id")?;
    let doctor_id = required_id(body.doctor_id, "doctor_id")?;

    let treatment = state
        .db
        .create_treatment(&description, patient_id, doctor_id, body.assistant_id)?;
    info!(id = treatment.id, patient_id, doctor_id, "Treatment created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Treatment ok",
            "treatment": TreatmentSummary::from(&treatment),
        })),
    ))
}

pub async fn get_treatment(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TreatmentSummary>, ApiError> {
    let Path(id) = id?;
    state
        .db
        .get_treatment(id)?
        .map(|t| Json(TreatmentSummary::from(&t)))
        .ok_or_else(|| ApiError::NotFound(format!("Treatment {} not found", id)))
}

// ===== Assignments =====

pub async fn assign_patient_to_assistant(
    State(state): State<AppState>,
    payload: Result<Json<NewAssignment>, JsonRejection>,
) -> Result<Created, ApiError> {
    let Json(body) = payload?;
    let patient_id = required_id(body.patient_id, "patient_id")?;
    let assistant_id = required_id(body.assistant_id, "assistant_id")?;

    let row = state
        .db
        .assign_assistant(patient_id, assistant_id)?
        .ok_or_else(|| ApiError::NotFound("Patient or Assistant not found".to_string()))?;
    info!(id = row.id, patient_id, assistant_id, "Patient assigned to assistant");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Patient assigned to assistant" })),
    ))
}
