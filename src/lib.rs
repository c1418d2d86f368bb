pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod types;
pub mod validation;

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{dummy_hash, AuthError, CredentialStore, TokenService};
use crate::config::AppConfig;
use crate::database::AccountRepository;

pub use server::{app, serve};

/// Shared by every handler. Built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: Arc<TokenService>,
    pub accounts: Arc<dyn CredentialStore>,
    /// Compared against on logins for unknown emails; same bcrypt cost as stored hashes.
    pub dummy_hash: Arc<str>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, AuthError> {
        let accounts = Arc::new(AccountRepository::new(pool.clone()));
        Self::with_accounts(config, pool, accounts)
    }

    /// Same as `new` with a caller-supplied account store.
    pub fn with_accounts(
        config: AppConfig,
        pool: PgPool,
        accounts: Arc<dyn CredentialStore>,
    ) -> Result<Self, AuthError> {
        let dummy = dummy_hash(config.security.bcrypt_cost)?;
        let tokens = TokenService::new(
            config.security.jwt_secret.as_bytes(),
            chrono::Duration::minutes(config.security.token_ttl_minutes),
        );
        Ok(Self {
            pool,
            tokens: Arc::new(tokens),
            accounts,
            dummy_hash: dummy.into(),
            config: Arc::new(config),
        })
    }
}
