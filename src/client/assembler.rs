use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::application::model::{Application, ApplicationStatus, FileMap};

/// Plain text fields of the public form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ApplicationForm {
    #[validate(length(min = 2, message = "Name must be at least 2 characters long"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 10, message = "Phone must be at least 10 characters long"))]
    pub phone: String,
    pub experience: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every rule the form broke, in form order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn has_violation(&self, field: &str) -> bool {
        self.violations.iter().any(|violation| violation.field == field)
    }
}

const FIELD_ORDER: [&str; 3] = ["name", "email", "phone"];

/// Validates the form and merges it with the encoded files into a fresh pending
/// [`Application`]. Collects all violations instead of stopping at the first.
pub fn assemble(form: ApplicationForm, files: FileMap) -> Result<Application, ValidationError> {
    let mut violations = Vec::new();

    if let Err(errors) = form.validate() {
        let by_field = errors.field_errors();
        for field in FIELD_ORDER {
            for error in by_field.get(field).into_iter().flat_map(|errors| errors.iter()) {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("Invalid {field}"));
                violations.push(Violation { field, message });
            }
        }
    }
    if files.passport.is_empty() {
        violations.push(Violation {
            field: "passport",
            message: "Passport copy is required".to_string(),
        });
    }
    if !violations.is_empty() {
        return Err(ValidationError { violations });
    }

    let now = Utc::now();
    Ok(Application {
        id: Uuid::now_v7().simple().to_string(),
        name: form.name,
        email: form.email,
        phone: form.phone,
        experience: form.experience.filter(|text| !text.is_empty()),
        message: form.message.filter(|text| !text.is_empty()),
        files,
        status: ApplicationStatus::Pending,
        archived: false,
        archived_at: None,
        auto_delete_date: None,
        created_at: now,
        updated_at: now,
    })
}
