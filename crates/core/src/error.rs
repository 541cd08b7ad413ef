use serde::Serialize;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::types::DbId;

/// A single invalid input field, surfaced next to the offending form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Coarse error category propagated to clients for differentiated handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Authorization,
    Transport,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    InvalidFields(Vec<FieldError>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Upstream failure: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The error category clients branch on.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::Validation(_) | CoreError::InvalidFields(_) => ErrorKind::Validation,
            CoreError::Conflict(_) => ErrorKind::Conflict,
            CoreError::Unauthorized(_) | CoreError::Forbidden(_) => ErrorKind::Authorization,
            CoreError::Transport(_) => ErrorKind::Transport,
            CoreError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Shorthand for a single-field validation failure.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        CoreError::InvalidFields(vec![FieldError {
            field: field.to_string(),
            message: message.into(),
        }])
    }
}

/// Validator for required text fields: rejects empty and whitespace-only values.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}

/// Flatten nested validation errors into `field`, `parent.field` and
/// `list[index].field` paths.
fn collect_field_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| FieldError {
                    field: path.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid ({})", e.code)),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors("", &errors, &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        CoreError::InvalidFields(fields)
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Form {
        #[validate(email(message = "Enter a valid email address"))]
        email: String,
        #[validate(length(min = 1))]
        name: String,
    }

    #[test]
    fn validation_errors_become_sorted_field_errors() {
        let form = Form {
            email: "nope".into(),
            name: String::new(),
        };
        let err: CoreError = form.validate().unwrap_err().into();
        match err {
            CoreError::InvalidFields(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].field, "email");
                assert_eq!(fields[0].message, "Enter a valid email address");
                assert_eq!(fields[1].field, "name");
                assert!(fields[1].message.contains("length"));
            }
            other => panic!("expected InvalidFields, got {other:?}"),
        }
    }

    #[derive(Validate)]
    struct Seat {
        #[validate(custom(function = "not_blank", message = "Seat name is required"))]
        name: String,
        #[validate(range(min = 1, message = "Capacity must be at least 1"))]
        capacity: u32,
    }

    #[derive(Validate)]
    struct FloorPlan {
        #[validate(custom(function = "not_blank", message = "Name is required"))]
        name: String,
        #[validate(nested)]
        seats: Vec<Seat>,
    }

    #[test]
    fn nested_list_errors_carry_their_index() {
        let plan = FloorPlan {
            name: "  ".into(),
            seats: vec![
                Seat {
                    name: "A".into(),
                    capacity: 2,
                },
                Seat {
                    name: String::new(),
                    capacity: 0,
                },
            ],
        };
        let err: CoreError = plan.validate().unwrap_err().into();
        let CoreError::InvalidFields(fields) = err else {
            panic!("expected InvalidFields");
        };
        let paths: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(paths, vec!["name", "seats[1].capacity", "seats[1].name"]);
        assert_eq!(fields[0].message, "Name is required");
        assert_eq!(fields[1].message, "Capacity must be at least 1");
    }

    #[test]
    fn kinds_collapse_auth_failures() {
        assert_eq!(
            CoreError::Unauthorized("x".into()).kind(),
            ErrorKind::Authorization
        );
        assert_eq!(CoreError::Forbidden("x".into()).kind(), ErrorKind::Authorization);
        assert_eq!(
            CoreError::NotFound {
                entity: "Restaurant",
                id: 1
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(CoreError::Transport("x".into()).kind(), ErrorKind::Transport);
    }
}
