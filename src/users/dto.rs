use lazy_static::lazy_static;
use serde::Deserialize;

use super::repo_types::ProfileChanges;
use crate::validation::{Check, FieldRule, Schema, Validate};

lazy_static! {
    static ref UPDATE_PROFILE_SCHEMA: Schema = Schema {
        rules: vec![
            FieldRule::optional("firstName", vec![Check::MinLen(2), Check::MaxLen(50)]),
            FieldRule::optional("lastName", vec![Check::MinLen(2), Check::MaxLen(50)]),
        ],
    };
}

/// Body of `PUT /api/users/profile`. Other keys (email, password) are
/// ignored; only names can change here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Validate for UpdateProfileRequest {
    fn schema() -> &'static Schema {
        &UPDATE_PROFILE_SCHEMA
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "firstName" => self.first_name.as_deref(),
            "lastName" => self.last_name.as_deref(),
            _ => None,
        }
    }
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
        }
    }
}
