use serde_json::Value;

use super::{cid, digits, text, FieldAlias, Payload, ValidationError};
use crate::types::Operation;

const DOCTOR_FIELDS: &[FieldAlias] = &[
    FieldAlias { canonical: "name", spellings: &["NAME", "name"] },
    FieldAlias { canonical: "hospcode", spellings: &["HOSPCODE", "hospcode"] },
    FieldAlias { canonical: "cid", spellings: &["CID", "cid"] },
    FieldAlias { canonical: "contact", spellings: &["CONTACT", "contact"] },
    FieldAlias { canonical: "address", spellings: &["ADDRESS", "address"] },
    FieldAlias { canonical: "status", spellings: &["STATUS", "status"] },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorStatus {
    Activate,
    Deactivate,
}

impl DoctorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DoctorStatus::Activate => "activate",
            DoctorStatus::Deactivate => "deactivate",
        }
    }

    /// Lower-cased and trimmed before matching the closed set.
    pub fn parse(value: &Value) -> Result<Self, ValidationError> {
        match text(value).to_lowercase().as_str() {
            "activate" => Ok(DoctorStatus::Activate),
            "deactivate" => Ok(DoctorStatus::Deactivate),
            _ => Err(ValidationError::InvalidStatus),
        }
    }
}

/// A doctor record payload after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorInput {
    pub name: String,
    pub hospcode: String,
    pub cid: String,
    pub contact: String,
    pub address: String,
    pub status: DoctorStatus,
}

/// Check order is name, hospcode, cid, contact, address, then status on update.
/// Presence of every required field is checked before its format, one field at a time.
/// Creates always start out `activate`; a submitted status is ignored.
pub fn validate_doctor(body: &Value, operation: Operation) -> Result<DoctorInput, ValidationError> {
    let payload = Payload::canonicalize(body, DOCTOR_FIELDS)?;

    let name = payload.require("name")?;
    let hospcode = payload.require("hospcode")?;
    let cid_value = payload.require("cid")?;
    let contact = payload.require("contact")?;
    let address = payload.require("address")?;
    let status = match operation {
        Operation::Update => Some(payload.require("status")?),
        Operation::Create => None,
    };

    Ok(DoctorInput {
        name: text(name),
        hospcode: digits("hospcode", hospcode)?,
        cid: cid(cid_value)?,
        contact: text(contact),
        address: text(address),
        status: match status {
            Some(value) => DoctorStatus::parse(value)?,
            None => DoctorStatus::Activate,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "name": "Dr. A",
            "hospcode": "10670",
            "cid": "1234567890123",
            "contact": "02-000-0000",
            "address": "Bangkok"
        })
    }

    #[test]
    fn accepts_valid_create() {
        let input = validate_doctor(&valid(), Operation::Create).unwrap();
        assert_eq!(input.name, "Dr. A");
        assert_eq!(input.hospcode, "10670");
        assert_eq!(input.cid, "1234567890123");
        assert_eq!(input.status, DoctorStatus::Activate);
    }

    #[test]
    fn twelve_digit_cid_is_rejected() {
        let mut body = valid();
        body["cid"] = json!("123456789012");
        assert_eq!(
            validate_doctor(&body, Operation::Create).unwrap_err().to_string(),
            "cid must be exactly 13 digits (0-9)"
        );
    }

    #[test]
    fn missing_fields_reported_in_order() {
        assert_eq!(validate_doctor(&json!({}), Operation::Create).unwrap_err(), ValidationError::Missing("name"));
        assert_eq!(
            validate_doctor(&json!({"name": "x", "cid": "bad"}), Operation::Create).unwrap_err(),
            ValidationError::Missing("hospcode")
        );
        assert_eq!(
            validate_doctor(&json!({"name": "x", "hospcode": "1", "cid": "1234567890123", "contact": null}), Operation::Create)
                .unwrap_err(),
            ValidationError::Missing("contact")
        );
    }

    #[test]
    fn presence_checked_before_format() {
        // hospcode is malformed but address is missing: the null check wins
        let body = json!({"name": "x", "hospcode": "abc", "cid": "1234567890123", "contact": "c"});
        assert_eq!(validate_doctor(&body, Operation::Create).unwrap_err(), ValidationError::Missing("address"));
    }

    #[test]
    fn hospcode_checked_before_cid() {
        let mut body = valid();
        body["hospcode"] = json!("1o670");
        body["cid"] = json!("1");
        assert_eq!(validate_doctor(&body, Operation::Create).unwrap_err(), ValidationError::NotDigits("hospcode"));
    }

    #[test]
    fn update_requires_status() {
        assert_eq!(validate_doctor(&valid(), Operation::Update).unwrap_err(), ValidationError::Missing("status"));

        let mut body = valid();
        body["status"] = json!("  DeActivate ");
        assert_eq!(validate_doctor(&body, Operation::Update).unwrap().status, DoctorStatus::Deactivate);

        body["status"] = json!("suspended");
        assert_eq!(validate_doctor(&body, Operation::Update).unwrap_err(), ValidationError::InvalidStatus);
    }

    #[test]
    fn upper_case_keys_and_numbers_are_normalized() {
        let body = json!({
            "NAME": "  Dr. B  ",
            "HOSPCODE": 10670,
            "CID": " 1234567890123 ",
            "CONTACT": "081",
            "ADDRESS": " Chiang Mai "
        });
        let input = validate_doctor(&body, Operation::Create).unwrap();
        assert_eq!(input.name, "Dr. B");
        assert_eq!(input.hospcode, "10670");
        assert_eq!(input.cid, "1234567890123");
        assert_eq!(input.address, "Chiang Mai");
    }
}
