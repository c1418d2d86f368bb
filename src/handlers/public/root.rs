use serde_json::{json, Value};

use crate::middleware::ApiResponse;

/// GET / - Liveness banner
pub async fn root() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "message": "API is running",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
