use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::UpdateFields;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
    pub provider: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i64>,
    pub location: Option<String>,
    /// Free text; callers usually store a comma separated list or JSON.
    pub interests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub interests: Option<String>,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }
}

/// Profile fields a user may edit. `Some(None)` clears an optional column.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub picture: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub provider: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub gender: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub age: Option<Option<i64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub interests: Option<Option<String>>,
}

impl UpdateFields for UserUpdate {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "email",
        "picture",
        "provider",
        "bio",
        "gender",
        "age",
        "location",
        "interests",
    ];
}
