// handlers/public/register.rs - POST /users handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use tracing::warn;

use crate::auth;
use crate::database::AccountSummary;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Single};
use crate::AppState;

/// POST /users - Register an account
///
/// Input: `{"name": "...", "email": "...", "password": "..."}`
/// Output (201): `{"ok": true, "statusCode": 201, "data": {"id", "name", "email"}}`
///
/// Refused with 403 unless `security.allow_registration` is on.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Single<AccountSummary>> {
    if !state.config.security.allow_registration {
        warn!("Registration attempt while registration is disabled");
        return Err(ApiError::forbidden("Registration is disabled"));
    }

    let Json(body) = body?;
    let account = auth::register(state.accounts.as_ref(), state.config.security.bcrypt_cost, &body).await?;
    Ok(ApiResponse::created(Single::new(AccountSummary::from(account))))
}
