use chrono::{NaiveDate, NaiveDateTime};
use parish_core::error::CoreResult;
use parish_core::types::{PrayerStatus, Visibility};
use parish_core::validate;
use serde::{Deserialize, Serialize};

use crate::model::{default_true, record};

record! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct PrayerCategory {
        pub id: i64,
        pub name: String,
        pub description: Option<String>,
        pub color: Option<String>,
        pub is_active: bool,
        pub created_at: Option<NaiveDateTime>,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPrayerCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewPrayerCategory {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for a bad name or color.
    pub fn validate(&self) -> CoreResult<()> {
        validate::text_len("name", &self.name, 1, Some(50))?;
        if let Some(color) = &self.color {
            validate::hex_color("color", color)?;
        }
        Ok(())
    }
}

record! {
    /// A prayer request.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct Prayer {
        pub id: i64,
        pub title: String,
        pub content: String,
        pub category: String,
        pub is_anonymous: bool,
        pub visibility: Visibility,
        pub status: PrayerStatus,
        pub prayer_period_start: Option<NaiveDate>,
        pub prayer_period_end: Option<NaiveDate>,
        pub answer_content: Option<String>,
        pub answer_date: Option<NaiveDate>,
        pub tags: Option<String>,
        pub created_by: i64,
        pub created_at: Option<NaiveDateTime>,
        pub updated_at: Option<NaiveDateTime>,
    }
}

fn check_prayer_text(
    title: Option<&str>,
    content: Option<&str>,
    category: Option<&str>,
    tags: Option<&str>,
) -> CoreResult<()> {
    validate::opt_text_len("title", title, 1, Some(200))?;
    validate::opt_text_len("content", content, 1, None)?;
    validate::opt_text_len("category", category, 1, Some(50))?;
    validate::opt_text_len("tags", tags, 0, Some(500))
}

fn check_period(start: Option<NaiveDate>, end: Option<NaiveDate>) -> CoreResult<()> {
    match (start, end) {
        (Some(start), Some(end)) => validate::ordered_range(&start, &end),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPrayer {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub status: PrayerStatus,
    #[serde(default)]
    pub prayer_period_start: Option<NaiveDate>,
    #[serde(default)]
    pub prayer_period_end: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Option<String>,
    pub created_by: i64,
}

impl NewPrayer {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for text out of bounds and
    /// `CoreError::PreconditionFailed` for a period that ends before it starts.
    pub fn validate(&self) -> CoreResult<()> {
        check_prayer_text(
            Some(&self.title),
            Some(&self.content),
            Some(&self.category),
            self.tags.as_deref(),
        )?;
        check_period(self.prayer_period_start, self.prayer_period_end)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrayerChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_anonymous: Option<bool>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub status: Option<PrayerStatus>,
    #[serde(default)]
    pub prayer_period_start: Option<NaiveDate>,
    #[serde(default)]
    pub prayer_period_end: Option<NaiveDate>,
    #[serde(default)]
    pub answer_content: Option<String>,
    #[serde(default)]
    pub answer_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Option<String>,
}

impl PrayerChanges {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for text out of bounds and
    /// `CoreError::PreconditionFailed` for a period that ends before it starts.
    pub fn validate(&self) -> CoreResult<()> {
        check_prayer_text(
            self.title.as_deref(),
            self.content.as_deref(),
            self.category.as_deref(),
            self.tags.as_deref(),
        )?;
        check_period(self.prayer_period_start, self.prayer_period_end)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrayerFilter {
    pub category: Option<String>,
    pub status: Option<PrayerStatus>,
    pub visibility: Option<Visibility>,
    /// Author of the request.
    pub user_id: Option<i64>,
}

record! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct PrayerParticipant {
        pub id: i64,
        pub prayer_id: i64,
        pub user_id: i64,
        pub participated_at: Option<NaiveDateTime>,
        pub username: Option<String>,
        pub full_name: Option<String>,
    }
}

record! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct PrayerComment {
        pub id: i64,
        pub prayer_id: i64,
        pub user_id: i64,
        pub comment: String,
        pub is_anonymous: bool,
        pub created_at: Option<NaiveDateTime>,
        pub username: Option<String>,
        pub full_name: Option<String>,
    }
}

/// A user joining in prayer for the request named in the path.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Participation {
    pub user_id: i64,
}

/// A comment posted to the prayer named in the request path.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPrayerComment {
    pub user_id: i64,
    pub comment: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl NewPrayerComment {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for an empty comment.
    pub fn validate(&self) -> CoreResult<()> {
        validate::text_len("comment", &self.comment, 1, None)
    }
}
