//! Declarative request validation.
//!
//! Each request DTO exposes a [`Schema`]: a list of [`FieldRule`]s that are
//! plain data (length bounds, format patterns). [`validate`] walks the schema
//! against the payload before anything reaches a service, and
//! [`ValidatedJson`] wires that into axum's extractor chain.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::{AppError, FieldError};

lazy_static! {
    pub static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

#[derive(Debug)]
pub enum Check {
    NotEmpty,
    MinLen(usize),
    MaxLen(usize),
    Email,
    Matches {
        regex: &'static Regex,
        message: &'static str,
    },
}

#[derive(Debug)]
pub struct FieldRule {
    pub field: &'static str,
    pub optional: bool,
    pub checks: Vec<Check>,
}

impl FieldRule {
    pub fn required(field: &'static str, checks: Vec<Check>) -> Self {
        Self {
            field,
            optional: false,
            checks,
        }
    }

    pub fn optional(field: &'static str, checks: Vec<Check>) -> Self {
        Self {
            field,
            optional: true,
            checks,
        }
    }
}

#[derive(Debug)]
pub struct Schema {
    pub rules: Vec<FieldRule>,
}

/// Implemented by every request body that is validated before use.
pub trait Validate {
    fn schema() -> &'static Schema;

    /// Value of the named field, `None` when the client omitted it.
    fn field(&self, name: &str) -> Option<&str>;
}

impl Check {
    fn failure(&self, field: &str, value: &str) -> Option<String> {
        let len = value.chars().count();
        match self {
            Check::NotEmpty if value.is_empty() => Some(format!("{field} should not be empty")),
            Check::MinLen(min) if len < *min => {
                Some(format!("{field} must be at least {min} characters"))
            }
            Check::MaxLen(max) if len > *max => {
                Some(format!("{field} must be at most {max} characters"))
            }
            Check::Email if !EMAIL_RE.is_match(value) => {
                Some(format!("{field} must be a valid email address"))
            }
            Check::Matches { regex, message } if !regex.is_match(value) => {
                Some((*message).to_string())
            }
            _ => None,
        }
    }
}

/// Runs `T`'s schema against `payload`, reporting the first failed check of
/// every field.
pub fn validate<T: Validate>(payload: &T) -> Result<(), AppError> {
    let mut errors = Vec::new();
    for rule in &T::schema().rules {
        let Some(value) = payload.field(rule.field) else {
            if !rule.optional {
                errors.push(FieldError {
                    field: rule.field.to_string(),
                    message: format!("{} is required", rule.field),
                });
            }
            continue;
        };
        if let Some(message) = rule.checks.iter().find_map(|c| c.failure(rule.field, value)) {
            errors.push(FieldError {
                field: rule.field.to_string(),
                message,
            });
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// JSON body that has been deserialized and validated.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::invalid_body(rejection.body_text()))?;
        validate(&payload)?;
        Ok(Self(payload))
    }
}
