//! Patient CRUD + search handlers.
//!
//! Each handler validates its input before any store access, checks a
//! connection out of the pool, runs the repository call, and wraps the result
//! in the endpoint's envelope.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::{NewPatient, Patient, PatientUpdate};

/// `GET /` — liveness probe, plain text.
pub async fn root() -> &'static str {
    "started"
}

#[derive(Serialize)]
pub struct AddPatientResponse {
    pub message: String,
    #[serde(rename = "insertId")]
    pub insert_id: i64,
}

/// `POST /addPatient` — insert a patient; all ten fields required.
pub async fn add(
    State(ctx): State<ApiContext>,
    Json(new): Json<NewPatient>,
) -> Result<Json<AddPatientResponse>, ApiError> {
    if !new.is_complete() {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    }

    let conn = ctx.pool.checkout()?;
    let insert_id = repository::insert_patient(&conn, &new)?;
    tracing::info!(pid = new.pid.as_deref(), "Patient added");

    Ok(Json(AddPatientResponse {
        message: "Patient added".into(),
        insert_id,
    }))
}

#[derive(Serialize)]
pub struct PatientListResponse {
    pub message: String,
    pub data: Vec<Patient>,
    pub count: usize,
}

/// `GET /patients` — all patients, most recent first.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<PatientListResponse>, ApiError> {
    let conn = ctx.pool.checkout()?;
    let data = repository::get_all_patients(&conn)?;
    let count = data.len();

    Ok(Json(PatientListResponse {
        message: "Patients retrieved successfully".into(),
        data,
        count,
    }))
}

#[derive(Serialize)]
pub struct PatientResponse {
    pub message: String,
    pub data: Patient,
}

/// `GET /patient/:pid` — single patient or 404.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(pid): Path<String>,
) -> Result<Json<PatientResponse>, ApiError> {
    let conn = ctx.pool.checkout()?;
    let patient = repository::get_patient(&conn, &pid)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;

    Ok(Json(PatientResponse {
        message: "Patient retrieved successfully".into(),
        data: patient,
    }))
}

#[derive(Serialize)]
pub struct UpdatePatientResponse {
    pub message: String,
    #[serde(rename = "affectedRows")]
    pub affected_rows: usize,
}

/// `PUT /patient/:pid` — partial update; at least one field required.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(pid): Path<String>,
    Json(update): Json<PatientUpdate>,
) -> Result<Json<UpdatePatientResponse>, ApiError> {
    if update.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one field is required for update".into(),
        ));
    }

    let mut conn = ctx.pool.checkout()?;
    let affected_rows = repository::update_patient(&mut conn, &pid, &update)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;
    tracing::info!(%pid, affected_rows, "Patient updated");

    Ok(Json(UpdatePatientResponse {
        message: "Patient updated successfully".into(),
        affected_rows,
    }))
}

#[derive(Serialize)]
pub struct DeletePatientResponse {
    pub message: String,
    #[serde(rename = "deletedPatient")]
    pub deleted_patient: Patient,
}

/// `DELETE /patient/:pid` — delete and return the pre-deletion snapshot.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(pid): Path<String>,
) -> Result<Json<DeletePatientResponse>, ApiError> {
    let mut conn = ctx.pool.checkout()?;
    let snapshot = repository::delete_patient(&mut conn, &pid)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;
    tracing::info!(%pid, "Patient deleted");

    Ok(Json(DeletePatientResponse {
        message: "Patient deleted successfully".into(),
        deleted_patient: snapshot,
    }))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub message: String,
    pub data: Vec<Patient>,
    pub count: usize,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
}

/// `GET /search/patients?name=` — substring search on pname.
pub async fn search(
    State(ctx): State<ApiContext>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let name = query
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Name parameter is required".into()))?;

    let conn = ctx.pool.checkout()?;
    let data = repository::search_patients_by_name(&conn, &name)?;
    let count = data.len();

    Ok(Json(SearchResponse {
        message: "Search completed".into(),
        data,
        count,
        search_term: name,
    }))
}
