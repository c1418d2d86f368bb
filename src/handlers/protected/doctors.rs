// handlers/protected/doctors.rs - /cm-users routes

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Extension, Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::database::{DoctorRecord, DoctorRepository, Page};
use crate::error::ApiError;
use crate::filter::ListParams;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Single};
use crate::types::Operation;
use crate::validation::validate_doctor;
use crate::AppState;

/// GET /cm-users - Paginated, sorted, searched doctor listing
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Page<DoctorRecord>> {
    let Query(params) = params?;
    let page = DoctorRepository::new(state.pool.clone()).list(&params).await?;
    Ok(ApiResponse::success(page))
}

/// POST /cm-users - Create a doctor record; it always starts out `activate`
pub async fn create(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Single<DoctorRecord>> {
    let Json(body) = body?;
    let input = validate_doctor(&body, Operation::Create)?;

    let record = DoctorRepository::new(state.pool.clone()).create(&input).await?;
    info!(user_id = %user.id, doctor_id = %record.id, "doctor record created");
    Ok(ApiResponse::created(Single::new(record)))
}

/// PUT /cm-users/:id - Replace every field of a doctor record, status included
pub async fn update(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Single<DoctorRecord>> {
    let Json(body) = body?;
    let input = validate_doctor(&body, Operation::Update)?;

    // An id that is not a UUID cannot name a stored record.
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::not_found(format!("Doctor record '{}' not found", id)))?;

    let record = DoctorRepository::new(state.pool.clone()).update(id, &input).await?;
    info!(user_id = %user.id, doctor_id = %record.id, status = %record.status, "doctor record updated");
    Ok(ApiResponse::success(Single::new(record)))
}
