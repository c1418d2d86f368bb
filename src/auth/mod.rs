use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::database::DatabaseError;
use crate::validation::ValidationError;

pub mod login;
pub mod password;
pub mod token;

pub use login::{dummy_hash, login, register, CredentialStore};
pub use token::TokenService;

/// The identity carried inside every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// JWT payload: the identity under `user` plus standard timing claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user: Identity,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No token, authorization denied")]
    MissingToken,

    #[error("Token is not valid")]
    ExpiredOrInvalid,

    /// Returned for both an unknown email and a wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Password hashing error: {0}")]
    Hash(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}
