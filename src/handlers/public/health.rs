use axum::extract::State;
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// GET /hospitals/health - Storage connectivity probe, exempt from the auth gate
pub async fn hospital_health(State(state): State<AppState>) -> ApiResult<Value> {
    match DatabaseManager::health_check(&state.pool).await {
        Ok(()) => Ok(ApiResponse::success(json!({
            "status": "ok",
            "database": "ok",
            "timestamp": chrono::Utc::now(),
        }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err(ApiError::service_unavailable("Database unavailable"))
        }
    }
}
