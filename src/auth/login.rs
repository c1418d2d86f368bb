use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::password::{hash_password, verify_password};
use super::{AuthError, Identity, TokenService};
use crate::database::accounts::{Account, NewAccount};
use crate::database::DatabaseError;
use crate::validation::validate_registration;

/// Account lookup and creation, the storage side of login and registration.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact-match lookup by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError>;

    /// Insert an account; a taken email is `DatabaseError::Conflict`.
    async fn create(&self, account: NewAccount) -> Result<Account, DatabaseError>;
}

const DUMMY_PASSWORD: &str = "cm-api-no-such-account";

/// Stand-in hash compared against when no account matches the email.
///
/// bcrypt work is set by the cost embedded in the hash, so this must be built
/// at the same cost as stored account hashes.
pub fn dummy_hash(cost: u32) -> Result<String, AuthError> {
    hash_password(DUMMY_PASSWORD, cost)
}

/// Verify credentials and issue a token.
///
/// An unknown email and a wrong password both end in `InvalidCredentials`,
/// and both pay for one bcrypt verification.
pub async fn login(
    store: &dyn CredentialStore,
    tokens: &TokenService,
    dummy_hash: &str,
    email: &str,
    password: &str,
) -> Result<String, AuthError> {
    let account = store.find_by_email(email).await?;

    let stored_hash = account.as_ref().map(|a| a.password_hash.clone());
    let candidate = password.to_string();
    let dummy = dummy_hash.to_string();
    let matched = tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_password(&candidate, &hash).unwrap_or_else(|e| {
            error!("Stored password hash could not be checked: {}", e);
            false
        }),
        None => {
            let _ = verify_password(&candidate, &dummy);
            false
        }
    })
    .await
    .map_err(|e| AuthError::Hash(e.to_string()))?;

    let account = match account {
        Some(account) if matched => account,
        _ => {
            warn!("Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }
    };

    let identity = Identity {
        id: account.id,
        email: account.email,
        name: account.name,
    };
    let token = tokens.issue(&identity)?;
    info!("User {} logged in", identity.id);
    Ok(token)
}

/// Validate a registration body, hash the password, and store the account.
pub async fn register(store: &dyn CredentialStore, bcrypt_cost: u32, body: &Value) -> Result<Account, AuthError> {
    let input = validate_registration(body)?;

    let password = input.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, bcrypt_cost))
        .await
        .map_err(|e| AuthError::Hash(e.to_string()))??;

    let account = store
        .create(NewAccount {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            password_hash,
        })
        .await?;

    info!("Registered account {}", account.id);
    Ok(account)
}
