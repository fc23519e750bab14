use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stored employee record. The id is assigned by the registry and never
/// changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub position: Option<String>,
    pub department: String,
}

/// Request payload for create and full-replacement update. The wire shape
/// accepts an `id` field so clients may echo records back, but the value is
/// ignored; the registry always decides ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeInput {
    pub id: Option<String>,
    pub name: String,
    pub position: Option<String>,
    pub department: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid employee payload")]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: &'static str,
}

impl EmployeeInput {
    /// Value-level checks on top of the wire shape: required strings must
    /// carry something other than whitespace.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let mut violations = Vec::new();
        if self.name.trim().is_empty() {
            violations.push(FieldViolation {
                field: "name",
                message: "must not be blank",
            });
        }
        if self.department.trim().is_empty() {
            violations.push(FieldViolation {
                field: "department",
                message: "must not be blank",
            });
        }
        if violations.is_empty() {
            Ok(self)
        } else {
            Err(ValidationError { violations })
        }
    }
}
