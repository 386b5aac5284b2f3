use chrono::NaiveDateTime;
use parish_core::error::{CoreError, CoreResult};
use parish_core::types::{BackupStatus, BackupType, LogLevel, SettingType};
use parish_core::validate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::result::{FromRow, Row};
use crate::error::DbResult;
use crate::model::record;

record! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct SystemSetting {
        pub id: i64,
        pub setting_key: String,
        pub setting_value: String,
        pub setting_type: SettingType,
        pub description: Option<String>,
        pub created_at: Option<NaiveDateTime>,
        pub updated_at: Option<NaiveDateTime>,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewSetting {
    pub setting_key: String,
    pub setting_value: String,
    #[serde(default)]
    pub setting_type: SettingType,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewSetting {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for an empty or overlong key.
    pub fn validate(&self) -> CoreResult<()> {
        validate::text_len("setting_key", &self.setting_key, 1, Some(100))
    }
}

/// New value (and optionally description) for an existing setting.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingChanges {
    pub setting_value: String,
    #[serde(default)]
    pub description: Option<String>,
}

record! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct SystemLog {
        pub id: i64,
        pub user_id: Option<i64>,
        pub log_level: LogLevel,
        pub log_type: String,
        pub message: String,
        pub ip_address: Option<String>,
        pub user_agent: Option<String>,
        pub additional_data: Option<String>,
        pub created_at: Option<NaiveDateTime>,
        pub username: Option<String>,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewLog {
    pub log_level: LogLevel,
    pub log_type: String,
    pub message: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub additional_data: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl NewLog {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for the first field out of bounds.
    pub fn validate(&self) -> CoreResult<()> {
        validate::text_len("log_type", &self.log_type, 1, Some(50))?;
        validate::text_len("message", &self.message, 1, None)?;
        validate::opt_text_len("ip_address", self.ip_address.as_deref(), 0, Some(45))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogFilter {
    pub log_level: Option<LogLevel>,
    pub log_type: Option<String>,
    pub user_id: Option<i64>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl LogFilter {
    /// ## Errors
    /// Returns `CoreError::PreconditionFailed` when the window ends before it starts.
    pub fn validate(&self) -> CoreResult<()> {
        match (&self.start_date, &self.end_date) {
            (Some(start), Some(end)) => validate::ordered_range(start, end),
            _ => Ok(()),
        }
    }
}

/// Age threshold for log cleanup.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LogRetention {
    pub days: Option<u32>,
}

impl LogRetention {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for zero days.
    pub fn resolve(self, default_days: u32) -> CoreResult<u32> {
        match self.days.unwrap_or(default_days) {
            0 => Err(CoreError::ValidationError(
                "days must be at least 1".to_string(),
            )),
            days => Ok(days),
        }
    }
}

record! {
    /// Metadata about a backup file. The file itself lives elsewhere.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct BackupRecord {
        pub id: i64,
        pub filename: String,
        pub file_size: Option<i64>,
        pub backup_type: BackupType,
        pub status: BackupStatus,
        pub created_by: Option<i64>,
        pub created_at: Option<NaiveDateTime>,
        pub created_by_username: Option<String>,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewBackup {
    pub filename: String,
    #[serde(default)]
    pub file_size: Option<i64>,
    pub backup_type: BackupType,
    #[serde(default)]
    pub status: BackupStatus,
    #[serde(default)]
    pub created_by: Option<i64>,
}

impl NewBackup {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for a bad filename or negative size.
    pub fn validate(&self) -> CoreResult<()> {
        validate::text_len("filename", &self.filename, 1, Some(255))?;
        if self.file_size.is_some_and(|size| size < 0) {
            return Err(CoreError::ValidationError(
                "file_size must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackupStatusChange {
    pub status: BackupStatus,
}

/// Headline numbers for the administration dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Active members only.
    pub member_count: i64,
    pub family_count: i64,
    /// Prayer requests created this calendar month.
    pub monthly_prayer_count: i64,
    /// Sum of offerings dated this calendar month.
    pub monthly_offering_amount: Decimal,
}

impl FromRow for DashboardStats {
    fn from_row(row: &Row<'_>) -> DbResult<Self> {
        Ok(Self {
            member_count: row.get("member_count")?,
            family_count: row.get("family_count")?,
            monthly_prayer_count: row.get("monthly_prayer_count")?,
            monthly_offering_amount: row
                .get::<Decimal>("monthly_offering_amount")?
                .round_dp(2),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn retention_defaults_and_rejects_zero() {
        assert_eq!(LogRetention { days: None }.resolve(90).unwrap(), 90);
        assert_eq!(LogRetention { days: Some(7) }.resolve(90).unwrap(), 7);
        assert!(LogRetention { days: Some(0) }.resolve(90).is_err());
    }

    #[test_log::test]
    fn log_level_must_be_known() {
        let result = serde_json::from_value::<NewLog>(serde_json::json!({
            "log_level": "TRACE",
            "log_type": "auth",
            "message": "login"
        }));
        assert!(result.is_err());
    }

    #[test_log::test]
    fn backup_status_defaults_to_in_progress() {
        let backup: NewBackup = serde_json::from_value(serde_json::json!({
            "filename": "parish-2024-03-01.db",
            "backup_type": "manual"
        }))
        .unwrap();
        assert_eq!(backup.status, BackupStatus::InProgress);
        assert!(backup.validate().is_ok());
    }
}
