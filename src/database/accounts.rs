use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::auth::CredentialStore;
use crate::database::manager::DatabaseError;

/// Row of the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

/// Public view of an account, as echoed after registration.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<Account> for AccountSummary {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for AccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, email, name, password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn create(&self, account: NewAccount) -> Result<Account, DatabaseError> {
        let email = account.email.clone();
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (id, name, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password
            "#,
        )
        .bind(account.id)
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, || format!("An account with email '{}' already exists", email)))
    }
}
