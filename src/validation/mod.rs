//! Normalization and validation of write payloads.
//!
//! Every write path runs its body through [`Payload::canonicalize`] first, which
//! maps the accepted external spellings of each field (`NAME`, `name`, ...) onto
//! one canonical name. The per-resource validators then check fields in a fixed
//! order and stop at the first violation.

use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

pub mod account;
pub mod doctor;
pub mod hospital;

pub use account::{validate_registration, RegistrationInput};
pub use doctor::{validate_doctor, DoctorInput, DoctorStatus};
pub use hospital::{validate_hospcode, validate_hospital_create, validate_hospital_update, HospitalInput, HospitalUpdate};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("{0} is null")]
    Missing(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must contain digits 0-9 only")]
    NotDigits(&'static str),

    #[error("cid must be exactly 13 digits (0-9)")]
    CidLength,

    #[error("status must be one of: activate, deactivate")]
    InvalidStatus,

    #[error("email format is invalid")]
    InvalidEmail,

    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),
}

/// Accepted external spellings for one canonical field, in precedence order.
#[derive(Debug)]
pub struct FieldAlias {
    pub canonical: &'static str,
    pub spellings: &'static [&'static str],
}

/// A request body reduced to canonical field names.
#[derive(Debug, Default)]
pub struct Payload {
    fields: HashMap<&'static str, Value>,
}

impl Payload {
    /// Keep only the known fields of `body`, renamed to their canonical names.
    /// For each field the first spelling holding a non-null value wins.
    pub fn canonicalize(body: &Value, aliases: &[FieldAlias]) -> Result<Self, ValidationError> {
        let object: &Map<String, Value> = body.as_object().ok_or(ValidationError::NotAnObject)?;
        let mut fields = HashMap::new();
        for alias in aliases {
            let found = alias
                .spellings
                .iter()
                .filter_map(|spelling| object.get(*spelling))
                .find(|v| !v.is_null());
            if let Some(value) = found {
                fields.insert(alias.canonical, value.clone());
            }
        }
        Ok(Self { fields })
    }

    /// The field's value, or `Missing` when it was absent or null.
    pub fn require(&self, field: &'static str) -> Result<&Value, ValidationError> {
        self.fields.get(field).ok_or(ValidationError::Missing(field))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Render any JSON scalar as text: strings as-is, numbers and booleans in
/// their literal form. Arrays and objects render as JSON and will fail any
/// pattern check that follows.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Trimmed free text.
pub fn text(value: &Value) -> String {
    coerce_string(value).trim().to_string()
}

/// Trimmed free text that must not be empty.
pub fn non_empty_text(field: &'static str, value: &Value) -> Result<String, ValidationError> {
    let s = text(value);
    if s.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(s)
}

/// Trimmed numeric string: one or more ASCII digits.
pub fn digits(field: &'static str, value: &Value) -> Result<String, ValidationError> {
    let s = text(value);
    if !is_digits(&s) {
        return Err(ValidationError::NotDigits(field));
    }
    Ok(s)
}

/// A 13-digit citizen identifier.
pub fn cid(value: &Value) -> Result<String, ValidationError> {
    let s = digits("cid", value)?;
    if s.len() != 13 {
        return Err(ValidationError::CidLength);
    }
    Ok(s)
}

pub fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
