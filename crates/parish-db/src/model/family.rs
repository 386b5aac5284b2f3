use chrono::NaiveDateTime;
use parish_core::constants::DEFAULT_FAMILY_ROLE;
use parish_core::error::CoreResult;
use parish_core::validate;
use serde::{Deserialize, Serialize};

use crate::model::record;

record! {
    /// A household, with its head's name and current member count.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct Family {
        pub id: i64,
        pub family_name: String,
        pub head_member_id: Option<i64>,
        pub address: Option<String>,
        pub created_at: Option<NaiveDateTime>,
        pub head_member_name: Option<String>,
        pub member_count: i64,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewFamily {
    pub family_name: String,
    #[serde(default)]
    pub head_member_id: Option<i64>,
    #[serde(default)]
    pub address: Option<String>,
}

impl NewFamily {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for an empty or overlong name.
    pub fn validate(&self) -> CoreResult<()> {
        validate::text_len("family_name", &self.family_name, 1, Some(100))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyChanges {
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub head_member_id: Option<i64>,
    #[serde(default)]
    pub address: Option<String>,
}

impl FamilyChanges {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for an empty or overlong name.
    pub fn validate(&self) -> CoreResult<()> {
        validate::opt_text_len("family_name", self.family_name.as_deref(), 1, Some(100))
    }
}

fn default_family_role() -> String {
    DEFAULT_FAMILY_ROLE.to_string()
}

/// Request to attach an existing member to a family.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyMembership {
    pub member_id: i64,
    #[serde(default = "default_family_role")]
    pub family_role: String,
}

impl FamilyMembership {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for an overlong role.
    pub fn validate(&self) -> CoreResult<()> {
        validate::text_len("family_role", &self.family_role, 0, Some(20))
    }
}
