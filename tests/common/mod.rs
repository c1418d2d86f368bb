#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use cm_api::auth::{self, CredentialStore};
use cm_api::config::AppConfig;
use cm_api::database::{Account, DatabaseError, DatabaseManager, NewAccount};
use cm_api::{app, AppState};

pub const EMAIL: &str = "admin@example.com";
pub const PASSWORD: &str = "password123";

/// Development defaults with a cheap bcrypt cost and a pool pointed at a port
/// nothing listens on, so any query fails fast.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.database.url = Some("postgres://cm:cm@127.0.0.1:1/cm_test".to_string());
    config.database.connection_timeout = 1;
    config.security.jwt_secret = "integration-test-secret".to_string();
    config.security.bcrypt_cost = 4;
    config
}

#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<Vec<Account>>,
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError> {
        Ok(self.accounts.lock().unwrap().iter().find(|a| a.email == email).cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, DatabaseError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(DatabaseError::Conflict(format!("An account with email '{}' already exists", account.email)));
        }
        let stored = Account {
            id: account.id,
            email: account.email,
            name: account.name,
            password_hash: account.password_hash,
        };
        accounts.push(stored.clone());
        Ok(stored)
    }
}

/// Router over an in-memory account store holding one seeded account.
pub async fn memory_app_with(config: AppConfig) -> Result<(Router, AppState)> {
    let pool = DatabaseManager::connect_lazy(&config.database)?;
    let store = Arc::new(MemoryStore::default());
    auth::register(
        store.as_ref(),
        config.security.bcrypt_cost,
        &json!({ "name": "Admin", "email": EMAIL, "password": PASSWORD }),
    )
    .await?;

    let state = AppState::with_accounts(config, pool, store)?;
    Ok((app(state.clone()), state))
}

pub async fn memory_app() -> Result<(Router, AppState)> {
    memory_app_with(test_config()).await
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<Request<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value)?)
        }
        None => Body::empty(),
    };
    Ok(builder.body(body)?)
}

pub async fn send_raw(app: &Router, request: Request<Body>) -> Result<(StatusCode, Bytes)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, bytes))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let (status, bytes) = send_raw(app, request(method, uri, token, body)?).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

pub async fn login_token(app: &Router, email: &str, password: &str) -> Result<String> {
    let (status, body) = send(
        app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);
    body["token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("no token in {}", body))
}

pub fn valid_doctor() -> Value {
    json!({
        "name": "Dr. A",
        "hospcode": "10670",
        "cid": "1234567890123",
        "contact": "02-000-0000",
        "address": "Bangkok"
    })
}
