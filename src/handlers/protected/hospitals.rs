// handlers/protected/hospitals.rs - /hospitals routes

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Extension, Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::database::{HospitalRecord, HospitalRepository, Page};
use crate::filter::ListParams;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Single};
use crate::validation::{validate_hospcode, validate_hospital_create, validate_hospital_update};
use crate::AppState;

/// GET /hospitals
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Page<HospitalRecord>> {
    let Query(params) = params?;
    let page = HospitalRepository::new(state.pool.clone()).list(&params).await?;
    Ok(ApiResponse::success(page))
}

/// POST /hospitals - 409 when the hospcode is taken
pub async fn create(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Single<HospitalRecord>> {
    let Json(body) = body?;
    let input = validate_hospital_create(&body)?;

    let record = HospitalRepository::new(state.pool.clone()).create(&input).await?;
    info!(user_id = %user.id, hospcode = %record.hospcode, "hospital created");
    Ok(ApiResponse::created(Single::new(record)))
}

/// PUT /hospitals/:hospcode
pub async fn update(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(hospcode): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Single<HospitalRecord>> {
    let hospcode = validate_hospcode(&hospcode)?;
    let Json(body) = body?;
    let input = validate_hospital_update(&body)?;

    let record = HospitalRepository::new(state.pool.clone()).update(&hospcode, &input).await?;
    info!(user_id = %user.id, hospcode = %record.hospcode, "hospital updated");
    Ok(ApiResponse::success(Single::new(record)))
}
