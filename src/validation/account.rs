use serde_json::Value;

use super::{coerce_string, non_empty_text, FieldAlias, Payload, ValidationError};

pub const MIN_PASSWORD_LENGTH: usize = 8;

const ACCOUNT_FIELDS: &[FieldAlias] = &[
    FieldAlias { canonical: "name", spellings: &["NAME", "name"] },
    FieldAlias { canonical: "email", spellings: &["EMAIL", "email"] },
    FieldAlias { canonical: "password", spellings: &["PASSWORD", "password"] },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Check order: name, email, password. The password is taken verbatim.
pub fn validate_registration(body: &Value) -> Result<RegistrationInput, ValidationError> {
    let payload = Payload::canonicalize(body, ACCOUNT_FIELDS)?;

    let name = payload.require("name")?;
    let email = payload.require("email")?;
    let password = payload.require("password")?;

    let name = non_empty_text("name", name)?;
    let email = non_empty_text("email", email)?;
    validate_email_format(&email)?;

    let password = coerce_string(password);
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    Ok(RegistrationInput { name, email, password })
}

fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(ValidationError::InvalidEmail),
    };
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}
