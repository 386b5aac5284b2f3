use chrono::{NaiveDate, NaiveDateTime};
use parish_core::constants::DEFAULT_MEMBER_POSITION;
use parish_core::error::CoreResult;
use parish_core::types::Gender;
use parish_core::validate;
use serde::{Deserialize, Serialize};

use crate::model::{default_true, record};

record! {
    /// A congregation member, with the family name and creator's username joined in.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct Member {
        pub id: i64,
        pub name: String,
        pub name_en: Option<String>,
        pub birth_date: NaiveDate,
        pub gender: Gender,
        pub phone: Option<String>,
        pub email: Option<String>,
        pub address: Option<String>,
        pub job: Option<String>,
        pub registration_date: NaiveDate,
        pub baptism_date: Option<NaiveDate>,
        pub position: String,
        pub district: Option<String>,
        pub family_id: Option<i64>,
        pub family_role: Option<String>,
        pub is_active: bool,
        pub notes: Option<String>,
        pub created_by: i64,
        pub created_at: Option<NaiveDateTime>,
        pub updated_at: Option<NaiveDateTime>,
        pub family_name: Option<String>,
        pub created_by_username: Option<String>,
    }
}

fn default_position() -> String {
    DEFAULT_MEMBER_POSITION.to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMember {
    pub name: String,
    #[serde(default)]
    pub name_en: Option<String>,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
    pub registration_date: NaiveDate,
    #[serde(default)]
    pub baptism_date: Option<NaiveDate>,
    #[serde(default = "default_position")]
    pub position: String,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub family_id: Option<i64>,
    #[serde(default)]
    pub family_role: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_by: i64,
}

impl NewMember {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for the first field out of bounds.
    pub fn validate(&self) -> CoreResult<()> {
        validate::text_len("name", &self.name, 1, Some(50))?;
        validate::text_len("position", &self.position, 0, Some(50))?;
        check_optional_fields(
            self.name_en.as_deref(),
            self.phone.as_deref(),
            self.email.as_deref(),
            self.job.as_deref(),
            self.district.as_deref(),
            self.family_role.as_deref(),
        )
    }
}

/// Partial member update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub registration_date: Option<NaiveDate>,
    #[serde(default)]
    pub baptism_date: Option<NaiveDate>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub family_id: Option<i64>,
    #[serde(default)]
    pub family_role: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MemberChanges {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for the first present field out of bounds.
    pub fn validate(&self) -> CoreResult<()> {
        validate::opt_text_len("name", self.name.as_deref(), 1, Some(50))?;
        validate::opt_text_len("position", self.position.as_deref(), 0, Some(50))?;
        check_optional_fields(
            self.name_en.as_deref(),
            self.phone.as_deref(),
            self.email.as_deref(),
            self.job.as_deref(),
            self.district.as_deref(),
            self.family_role.as_deref(),
        )
    }
}

fn check_optional_fields(
    name_en: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
    job: Option<&str>,
    district: Option<&str>,
    family_role: Option<&str>,
) -> CoreResult<()> {
    validate::opt_text_len("name_en", name_en, 0, Some(100))?;
    validate::opt_text_len("phone", phone, 0, Some(20))?;
    if let Some(email) = email {
        validate::email("email", email)?;
    }
    validate::opt_text_len("job", job, 0, Some(100))?;
    validate::opt_text_len("district", district, 0, Some(50))?;
    validate::opt_text_len("family_role", family_role, 0, Some(20))
}

/// Optional list filters; each present value narrows the result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberFilter {
    /// Substring of the member's name.
    pub name: Option<String>,
    pub district: Option<String>,
    pub position: Option<String>,
    pub family_id: Option<i64>,
    pub is_active: Option<bool>,
}
