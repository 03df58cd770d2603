//! Request body validation for create and update.
//!
//! The body is parsed as untyped JSON first so each failure can be reported
//! with a precise message, in a fixed order: object shape, field presence,
//! field types, then field values.

use serde_json::{Map, Value};
use thiserror::Error;

use taskd_types::{TaskDraft, TaskStatus};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("name must be a string")]
    NameNotString,

    #[error("name cannot be empty")]
    EmptyName,

    #[error("status must be a number")]
    StatusNotNumber,

    #[error("status must be 0 or 1")]
    StatusOutOfRange,
}

/// Validate a create/update body and turn it into a draft.
///
/// Any `id` in the body is ignored.
pub fn parse_task_request(body: &[u8]) -> Result<TaskDraft, ValidationError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(ValidationError::InvalidJson("expected a JSON object".into()));
    };
    validate_fields(&fields)
}

fn validate_fields(fields: &Map<String, Value>) -> Result<TaskDraft, ValidationError> {
    let name = fields.get("name").ok_or(ValidationError::Missing("name"))?;
    let status = fields.get("status").ok_or(ValidationError::Missing("status"))?;

    let name = name.as_str().ok_or(ValidationError::NameNotString)?;
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let status = status.as_f64().ok_or(ValidationError::StatusNotNumber)?;
    let status = match status {
        s if s == 0.0 => TaskStatus::Pending,
        s if s == 1.0 => TaskStatus::Done,
        _ => return Err(ValidationError::StatusOutOfRange),
    };

    Ok(TaskDraft::new(name, status))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<TaskDraft, ValidationError> {
        parse_task_request(json.as_bytes())
    }

    #[test]
    fn valid_request() {
        let draft = parse(r#"{"name":"Test Task","status":0}"#).unwrap();
        assert_eq!(draft, TaskDraft::new("Test Task", TaskStatus::Pending));

        let draft = parse(r#"{"name":"Done Task","status":1}"#).unwrap();
        assert_eq!(draft.status, TaskStatus::Done);
    }

    #[test]
    fn name_is_kept_untrimmed() {
        let draft = parse(r#"{"name":"  padded  ","status":0}"#).unwrap();
        assert_eq!(draft.name, "  padded  ");
    }

    #[test]
    fn float_forms_of_valid_statuses() {
        assert_eq!(parse(r#"{"name":"x","status":1.0}"#).unwrap().status, TaskStatus::Done);
        assert_eq!(parse(r#"{"name":"x","status":-0.0}"#).unwrap().status, TaskStatus::Pending);
    }

    #[test]
    fn client_id_is_ignored() {
        let draft = parse(r#"{"id":"abc","name":"x","status":0}"#).unwrap();
        assert_eq!(draft, TaskDraft::new("x", TaskStatus::Pending));
    }

    #[test]
    fn invalid_json() {
        let err = parse("{not json").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidJson(_)));
        assert!(err.to_string().starts_with("invalid JSON: "));

        assert!(matches!(parse(""), Err(ValidationError::InvalidJson(_))));
        assert!(matches!(parse("[1,2]"), Err(ValidationError::InvalidJson(_))));
    }

    #[test]
    fn missing_fields() {
        assert_eq!(parse(r#"{"status":0}"#), Err(ValidationError::Missing("name")));
        assert_eq!(parse(r#"{"name":"x"}"#), Err(ValidationError::Missing("status")));
        assert_eq!(parse("{}").unwrap_err().to_string(), "name is required");
    }

    #[test]
    fn wrong_types() {
        assert_eq!(parse(r#"{"name":123,"status":0}"#), Err(ValidationError::NameNotString));
        assert_eq!(parse(r#"{"name":null,"status":0}"#), Err(ValidationError::NameNotString));
        assert_eq!(parse(r#"{"name":"x","status":"0"}"#), Err(ValidationError::StatusNotNumber));
        assert_eq!(parse(r#"{"name":"x","status":null}"#), Err(ValidationError::StatusNotNumber));
    }

    #[test]
    fn blank_names() {
        assert_eq!(parse(r#"{"name":"","status":0}"#), Err(ValidationError::EmptyName));
        assert_eq!(parse(r#"{"name":"   \t\n","status":0}"#), Err(ValidationError::EmptyName));
    }

    #[test]
    fn status_out_of_range() {
        for body in [
            r#"{"name":"x","status":2}"#,
            r#"{"name":"x","status":-1}"#,
            r#"{"name":"x","status":0.5}"#,
        ] {
            assert_eq!(parse(body), Err(ValidationError::StatusOutOfRange), "{body}");
        }
        assert_eq!(
            ValidationError::StatusOutOfRange.to_string(),
            "status must be 0 or 1"
        );
    }

    #[test]
    fn presence_checked_before_types() {
        // Both fields wrong-typed but status missing: presence wins.
        assert_eq!(parse(r#"{"name":5}"#), Err(ValidationError::Missing("status")));
    }
}
