use serde_json::Value;

use super::{digits, non_empty_text, FieldAlias, Payload, ValidationError};

const HOSPITAL_FIELDS: &[FieldAlias] = &[
    FieldAlias { canonical: "hospcode", spellings: &["HOSPCODE", "hospcode"] },
    FieldAlias { canonical: "name", spellings: &["NAME", "name"] },
    FieldAlias { canonical: "headquarter", spellings: &["HEADQUARTER", "headquarter"] },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HospitalInput {
    pub hospcode: String,
    pub name: String,
    pub headquarter: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HospitalUpdate {
    pub name: String,
    pub headquarter: String,
}

/// Check order: hospcode, name, headquarter.
pub fn validate_hospital_create(body: &Value) -> Result<HospitalInput, ValidationError> {
    let payload = Payload::canonicalize(body, HOSPITAL_FIELDS)?;

    let hospcode = payload.require("hospcode")?;
    let name = payload.require("name")?;
    let headquarter = payload.require("headquarter")?;

    Ok(HospitalInput {
        hospcode: digits("hospcode", hospcode)?,
        name: non_empty_text("name", name)?,
        headquarter: digits("headquarter", headquarter)?,
    })
}

/// The hospcode comes from the path; only name and headquarter are replaced.
pub fn validate_hospital_update(body: &Value) -> Result<HospitalUpdate, ValidationError> {
    let payload = Payload::canonicalize(body, HOSPITAL_FIELDS)?;

    let name = payload.require("name")?;
    let headquarter = payload.require("headquarter")?;

    Ok(HospitalUpdate {
        name: non_empty_text("name", name)?,
        headquarter: digits("headquarter", headquarter)?,
    })
}

/// Path parameter form of a hospcode.
pub fn validate_hospcode(raw: &str) -> Result<String, ValidationError> {
    digits("hospcode", &Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_upper_case_payload() {
        let input = validate_hospital_create(&json!({
            "HOSPCODE": " 10670 ",
            "NAME": " Bangkok Hospital ",
            "HEADQUARTER": "10001"
        }))
        .unwrap();
        assert_eq!(
            input,
            HospitalInput {
                hospcode: "10670".into(),
                name: "Bangkok Hospital".into(),
                headquarter: "10001".into()
            }
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = validate_hospital_create(&json!({"HOSPCODE": "1", "NAME": "   ", "HEADQUARTER": "2"})).unwrap_err();
        assert_eq!(err, ValidationError::Empty("name"));
    }

    #[test]
    fn non_digit_codes_are_rejected() {
        let err = validate_hospital_create(&json!({"HOSPCODE": "H10", "NAME": "x", "HEADQUARTER": "2"})).unwrap_err();
        assert_eq!(err, ValidationError::NotDigits("hospcode"));

        let err = validate_hospital_update(&json!({"name": "x", "headquarter": "2-1"})).unwrap_err();
        assert_eq!(err.to_string(), "headquarter must contain digits 0-9 only");
    }

    #[test]
    fn update_requires_both_fields() {
        assert_eq!(validate_hospital_update(&json!({"NAME": "x"})).unwrap_err(), ValidationError::Missing("headquarter"));
        assert_eq!(validate_hospital_update(&json!({})).unwrap_err(), ValidationError::Missing("name"));
    }

    #[test]
    fn path_hospcode_is_trimmed_and_checked() {
        assert_eq!(validate_hospcode(" 10670").unwrap(), "10670");
        assert!(validate_hospcode("10670x").is_err());
    }
}
