use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::ApiError;

/// Success envelope: `{ok: true, statusCode, ...payload}`.
///
/// Object payloads have their keys merged into the envelope; any other payload
/// lands under `data`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub payload: T,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK
    pub fn success(payload: T) -> Self {
        Self::with_status(payload, StatusCode::OK)
    }

    pub fn with_status(payload: T, status_code: StatusCode) -> Self {
        Self { payload, status_code }
    }

    /// 201 Created
    pub fn created(payload: T) -> Self {
        Self::with_status(payload, StatusCode::CREATED)
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        let mut envelope = Map::new();
        envelope.insert("ok".into(), Value::Bool(true));
        envelope.insert("statusCode".into(), json!(self.status_code.as_u16()));

        match serde_json::to_value(&self.payload)? {
            Value::Object(fields) => {
                for (key, value) in fields {
                    // Envelope keys always win.
                    envelope.entry(key).or_insert(value);
                }
            }
            Value::Null => {}
            other => {
                envelope.insert("data".into(), other);
            }
        }
        Ok(Value::Object(envelope))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self.to_json() {
            Ok(body) => (self.status_code, Json(body)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                ApiError::internal().into_response()
            }
        }
    }
}

/// One record under `data`.
#[derive(Debug, Serialize)]
pub struct Single<T> {
    pub data: T,
}

impl<T> Single<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::PageMeta;

    #[test]
    fn object_payload_is_merged() {
        let body = ApiResponse::success(json!({"token": "abc"})).to_json().unwrap();
        assert_eq!(body, json!({"ok": true, "statusCode": 200, "token": "abc"}));
    }

    #[test]
    fn created_reports_201() {
        let body = ApiResponse::created(Single::new(json!({"id": 1}))).to_json().unwrap();
        assert_eq!(body["statusCode"], 201);
        assert_eq!(body["data"]["id"], 1);
    }

    #[test]
    fn payload_cannot_override_envelope() {
        let body = ApiResponse::success(json!({"ok": false, "statusCode": 500})).to_json().unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(body["statusCode"], 200);
    }

    #[test]
    fn list_payload_keys_are_camel_case() {
        #[derive(Serialize)]
        struct Page {
            data: Vec<u8>,
            #[serde(flatten)]
            meta: PageMeta,
        }
        let page = Page {
            data: vec![],
            meta: PageMeta { page: 1, limit: 10, total: 0, total_pages: 0 },
        };
        let body = ApiResponse::success(page).to_json().unwrap();
        assert_eq!(body["totalPages"], 0);
        assert!(body["data"].as_array().unwrap().is_empty());
    }
}
