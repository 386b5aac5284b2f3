//! Settings, audit log records, backup records and the dashboard.

use std::sync::Arc;

use parish_core::constants::DEFAULT_LOG_RETENTION_DAYS;
use parish_core::page::Page;
use parish_db::db::DbProvider;
use parish_db::db::query::{UpdateOutcome, system};
use parish_db::model::system::{
    BackupRecord, BackupStatusChange, DashboardStats, LogFilter, LogRetention, NewBackup, NewLog,
    NewSetting, SettingChanges, SystemLog, SystemSetting,
};

use crate::error::{ServiceError, ServiceResult, found};
use crate::refs;

const SETTING: &str = "Setting";
const BACKUP: &str = "Backup";

#[derive(Clone)]
pub struct SystemService {
    db: Arc<dyn DbProvider>,
}

impl SystemService {
    #[must_use]
    pub fn new(db: Arc<dyn DbProvider>) -> Self {
        Self { db }
    }

    /// ## Errors
    /// Returns storage failures.
    #[tracing::instrument(skip(self))]
    pub async fn list_settings(&self, page: Page) -> ServiceResult<Vec<SystemSetting>> {
        let mut conn = self.db.get_connection().await?;
        Ok(system::list_settings(&mut conn, page).await?)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if no setting has this key.
    #[tracing::instrument(skip(self))]
    pub async fn get_setting(&self, key: &str) -> ServiceResult<SystemSetting> {
        let mut conn = self.db.get_connection().await?;
        found(system::find_setting(&mut conn, key).await?, SETTING)
    }

    /// ## Errors
    /// Returns a validation error for a bad key, or a storage failure (including a duplicate key).
    #[tracing::instrument(skip(self, payload), fields(key = %payload.setting_key))]
    pub async fn create_setting(&self, payload: &NewSetting) -> ServiceResult<i64> {
        payload.validate()?;
        let mut conn = self.db.get_connection().await?;
        Ok(system::insert_setting(&mut conn, payload).await?)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if no setting has this key.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update_setting(
        &self,
        key: &str,
        changes: &SettingChanges,
    ) -> ServiceResult<SystemSetting> {
        let mut conn = self.db.get_connection().await?;
        match system::update_setting(&mut conn, key, changes).await? {
            UpdateOutcome::Missing => Err(ServiceError::NotFound(SETTING)),
            UpdateOutcome::Applied | UpdateOutcome::NoChanges => {
                found(system::find_setting(&mut conn, key).await?, SETTING)
            }
        }
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if no setting has this key.
    #[tracing::instrument(skip(self))]
    pub async fn delete_setting(&self, key: &str) -> ServiceResult<()> {
        let mut conn = self.db.get_connection().await?;
        if !system::delete_setting(&mut conn, key).await? {
            return Err(ServiceError::NotFound(SETTING));
        }
        Ok(())
    }

    /// ## Errors
    /// Returns a validation error for a bad field, `ServiceError::NotFound` for an
    /// unknown user, or a storage failure.
    #[tracing::instrument(skip(self, payload))]
    pub async fn create_log(&self, payload: &NewLog) -> ServiceResult<i64> {
        payload.validate()?;
        let mut conn = self.db.get_connection().await?;
        refs::require_user(&mut conn, payload.user_id).await?;
        Ok(system::insert_log(&mut conn, payload).await?)
    }

    /// ## Errors
    /// Returns a precondition failure for an inverted time window, or a storage failure.
    #[tracing::instrument(skip(self))]
    pub async fn list_logs(&self, filter: &LogFilter, page: Page) -> ServiceResult<Vec<SystemLog>> {
        filter.validate()?;
        let mut conn = self.db.get_connection().await?;
        Ok(system::list_logs(&mut conn, filter, page).await?)
    }

    /// ## Summary
    /// Deletes log entries older than the requested number of days (90 by default)
    /// and returns how many were removed.
    ///
    /// ## Errors
    /// Returns a validation error for zero days, or a storage failure.
    #[tracing::instrument(skip(self))]
    pub async fn clear_logs(&self, retention: LogRetention) -> ServiceResult<u64> {
        let days = retention.resolve(DEFAULT_LOG_RETENTION_DAYS)?;
        let mut conn = self.db.get_connection().await?;
        let removed = system::delete_logs_older_than(&mut conn, days).await?;
        tracing::info!(days, removed, "Old system logs cleared");
        Ok(removed)
    }

    /// ## Errors
    /// Returns a validation error for a bad filename or size, `ServiceError::NotFound`
    /// for an unknown creating user, or a storage failure.
    #[tracing::instrument(skip(self, payload))]
    pub async fn create_backup(&self, payload: &NewBackup) -> ServiceResult<i64> {
        payload.validate()?;
        let mut conn = self.db.get_connection().await?;
        refs::require_user(&mut conn, payload.created_by).await?;
        Ok(system::insert_backup(&mut conn, payload).await?)
    }

    /// ## Errors
    /// Returns storage failures.
    #[tracing::instrument(skip(self))]
    pub async fn list_backups(&self, page: Page) -> ServiceResult<Vec<BackupRecord>> {
        let mut conn = self.db.get_connection().await?;
        Ok(system::list_backups(&mut conn, page).await?)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if the backup record does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn update_backup_status(
        &self,
        id: i64,
        change: BackupStatusChange,
    ) -> ServiceResult<BackupRecord> {
        let mut conn = self.db.get_connection().await?;
        if system::update_backup_status(&mut conn, id, change.status).await?
            == UpdateOutcome::Missing
        {
            return Err(ServiceError::NotFound(BACKUP));
        }
        found(system::find_backup(&mut conn, id).await?, BACKUP)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if the backup record does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn delete_backup(&self, id: i64) -> ServiceResult<()> {
        let mut conn = self.db.get_connection().await?;
        if !system::delete_backup(&mut conn, id).await? {
            return Err(ServiceError::NotFound(BACKUP));
        }
        Ok(())
    }

    /// ## Errors
    /// Returns storage failures.
    #[tracing::instrument(skip(self))]
    pub async fn dashboard(&self) -> ServiceResult<DashboardStats> {
        let mut conn = self.db.get_connection().await?;
        Ok(system::dashboard_stats(&mut conn).await?)
    }
}
