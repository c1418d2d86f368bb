// handlers/public/login.rs - POST /login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use crate::auth;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// POST /login - Exchange email and password for a bearer token
///
/// Input: `{"email": "...", "password": "..."}`
/// Output: `{"ok": true, "statusCode": 200, "token": "eyJ..."}`
///
/// A missing field goes through the same lookup and hash comparison as a
/// wrong password, so every credential failure looks the same to the caller.
pub async fn login(State(state): State<AppState>, body: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    let Json(body) = body?;

    let email = string_field(&body, "email");
    let password = string_field(&body, "password");

    let token = auth::login(state.accounts.as_ref(), &state.tokens, &state.dummy_hash, email, password).await?;
    Ok(ApiResponse::success(json!({ "token": token })))
}

fn string_field<'a>(body: &'a Value, field: &str) -> &'a str {
    body.get(field).and_then(Value::as_str).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_string_fields_read_as_empty() {
        let body = json!({"email": 42, "password": null});
        assert_eq!(string_field(&body, "email"), "");
        assert_eq!(string_field(&body, "password"), "");
        assert_eq!(string_field(&body, "missing"), "");
    }
}
