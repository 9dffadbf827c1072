use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::users::repo_types::PublicUser;
use crate::validation::{Check, FieldRule, Schema, Validate};

lazy_static! {
    static ref PASSWORD_CHARS_RE: Regex = Regex::new(r"^[A-Za-z\d@$!%*#?&]+$").unwrap();
    static ref HAS_LETTER_RE: Regex = Regex::new(r"[A-Za-z]").unwrap();
    static ref HAS_DIGIT_RE: Regex = Regex::new(r"\d").unwrap();
    static ref REGISTER_SCHEMA: Schema = Schema {
        rules: vec![
            FieldRule::required("email", vec![Check::Email]),
            FieldRule::required("firstName", vec![Check::MinLen(2), Check::MaxLen(50)]),
            FieldRule::required("lastName", vec![Check::MinLen(2), Check::MaxLen(50)]),
            FieldRule::required(
                "password",
                vec![
                    Check::MinLen(6),
                    Check::MaxLen(50),
                    Check::Matches {
                        regex: &PASSWORD_CHARS_RE,
                        message: "password may only contain letters, numbers and @$!%*#?&",
                    },
                    Check::Matches {
                        regex: &HAS_LETTER_RE,
                        message: "password must contain at least one letter and one number",
                    },
                    Check::Matches {
                        regex: &HAS_DIGIT_RE,
                        message: "password must contain at least one letter and one number",
                    },
                ],
            ),
        ],
    };
    static ref LOGIN_SCHEMA: Schema = Schema {
        rules: vec![
            FieldRule::required("email", vec![Check::Email]),
            FieldRule::required("password", vec![Check::NotEmpty]),
        ],
    };
}

/// Request body for registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for RegisterRequest {
    fn schema() -> &'static Schema {
        &REGISTER_SCHEMA
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "email" => Some(&self.email),
            "firstName" => Some(&self.first_name),
            "lastName" => Some(&self.last_name),
            "password" => Some(&self.password),
            _ => None,
        }
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn schema() -> &'static Schema {
        &LOGIN_SCHEMA
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "email" => Some(&self.email),
            "password" => Some(&self.password),
            _ => None,
        }
    }
}

/// `data` of a successful register or login.
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: PublicUser,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::validation::validate;

    fn register(email: &str, first: &str, last: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            first_name: first.into(),
            last_name: last.into(),
            password: password.into(),
        }
    }

    fn failed_fields(req: &RegisterRequest) -> Vec<String> {
        match validate(req) {
            Ok(()) => Vec::new(),
            Err(AppError::Validation(errs)) => errs.into_iter().map(|e| e.field).collect(),
            Err(other) => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(failed_fields(&register("a@x.com", "Ana", "Lopez", "abc123")).is_empty());
    }

    #[test]
    fn name_bounds() {
        assert_eq!(failed_fields(&register("a@x.com", "A", "Lopez", "abc123")), ["firstName"]);
        let long = "x".repeat(51);
        assert_eq!(failed_fields(&register("a@x.com", "Ana", &long, "abc123")), ["lastName"]);
        let max = "x".repeat(50);
        assert!(failed_fields(&register("a@x.com", &max, "Lo", "abc123")).is_empty());
    }

    #[test]
    fn password_rules() {
        for bad in ["abc12", "abcdef", "123456", "abc 123", "abc123~"] {
            assert_eq!(
                failed_fields(&register("a@x.com", "Ana", "Lopez", bad)),
                ["password"],
                "{bad} should be rejected"
            );
        }
        assert!(failed_fields(&register("a@x.com", "Ana", "Lopez", "P@ss1!")).is_empty());
    }

    #[test]
    fn missing_fields_deserialize_empty_and_fail() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(failed_fields(&req), ["firstName", "lastName", "password"]);
    }

    #[test]
    fn login_requires_email_format_and_password() {
        let req = LoginRequest {
            email: "nope".into(),
            password: String::new(),
        };
        match validate(&req) {
            Err(AppError::Validation(errs)) => assert_eq!(errs.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}
