use parish_core::page::Page;
use parish_core::types::BackupStatus;

use crate::db::DbConnection;
use crate::db::query::column::columns;
use crate::db::query::{Direction, InsertQuery, Op, SelectQuery, UpdateOutcome, UpdateQuery};
use crate::db::statement::Statement;
use crate::error::{DbError, DbResult};
use crate::model::system::{
    BackupRecord, DashboardStats, LogFilter, NewBackup, NewLog, NewSetting, SettingChanges,
    SystemLog, SystemSetting,
};

columns!(pub enum SettingColumn as "s" {
    Id => "id",
    SettingKey => "setting_key",
    SettingValue => "setting_value",
    SettingType => "setting_type",
    Description => "description",
    CreatedAt => "created_at",
    UpdatedAt => "updated_at",
});

columns!(pub enum LogColumn as "l" {
    Id => "id",
    UserId => "user_id",
    LogLevel => "log_level",
    LogType => "log_type",
    Message => "message",
    IpAddress => "ip_address",
    UserAgent => "user_agent",
    AdditionalData => "additional_data",
    CreatedAt => "created_at",
});

columns!(pub enum BackupColumn as "b" {
    Id => "id",
    Filename => "filename",
    FileSize => "file_size",
    BackupType => "backup_type",
    Status => "status",
    CreatedBy => "created_by",
    CreatedAt => "created_at",
});

const SETTING_TABLE: &str = "system_settings";
const LOG_TABLE: &str = "system_logs";
const BACKUP_TABLE: &str = "backup_history";

const SETTING_SELECT: &str = "SELECT s.id, s.setting_key, s.setting_value, s.setting_type, \
     s.description, s.created_at, s.updated_at FROM system_settings s";

const LOG_SELECT: &str = "SELECT l.id, l.user_id, l.log_level, l.log_type, l.message, l.ip_address, \
     l.user_agent, l.additional_data, l.created_at, u.username AS username \
     FROM system_logs l LEFT JOIN users u ON u.id = l.user_id";

const BACKUP_SELECT: &str = "SELECT b.id, b.filename, b.file_size, b.backup_type, b.status, \
     b.created_by, b.created_at, u.username AS created_by_username \
     FROM backup_history b LEFT JOIN users u ON u.id = b.created_by";

const DASHBOARD_SQL: &str = "SELECT \
     (SELECT COUNT(*) FROM members WHERE is_active = 1) AS member_count, \
     (SELECT COUNT(*) FROM families) AS family_count, \
     (SELECT COUNT(*) FROM prayers \
        WHERE strftime('%Y-%m', created_at) = strftime('%Y-%m', 'now')) AS monthly_prayer_count, \
     (SELECT COALESCE(SUM(amount), 0) FROM offerings \
        WHERE strftime('%Y-%m', offering_date) = strftime('%Y-%m', 'now')) AS monthly_offering_amount";
const DASHBOARD_COLUMNS: &[&str] = &[
    "member_count",
    "family_count",
    "monthly_prayer_count",
    "monthly_offering_amount",
];

/// ## Summary
/// Lists settings by key.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn list_settings(conn: &mut DbConnection, page: Page) -> DbResult<Vec<SystemSetting>> {
    let stmt = SelectQuery::new(SETTING_SELECT, SettingColumn::Id)
        .projection(SystemSetting::COLUMNS)
        .order_by(SettingColumn::SettingKey, Direction::Asc)
        .build(page);
    conn.fetch_all(&stmt).await
}

/// ## Summary
/// Fetches one setting by key.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn find_setting(conn: &mut DbConnection, key: &str) -> DbResult<Option<SystemSetting>> {
    let stmt = SelectQuery::new(SETTING_SELECT, SettingColumn::Id)
        .projection(SystemSetting::COLUMNS)
        .where_eq(SettingColumn::SettingKey, Some(key))
        .build_all();
    conn.fetch_optional(&stmt).await
}

fn setting_insert(setting: &NewSetting) -> InsertQuery<SettingColumn> {
    InsertQuery::new(SETTING_TABLE)
        .value(SettingColumn::SettingKey, setting.setting_key.as_str())
        .value(SettingColumn::SettingValue, setting.setting_value.as_str())
        .value(SettingColumn::SettingType, setting.setting_type)
        .value(SettingColumn::Description, setting.description.as_deref())
}

/// ## Summary
/// Inserts a setting and returns its id.
///
/// ## Errors
/// Returns storage failures, including a duplicate key.
#[tracing::instrument(skip(conn, setting), fields(key = %setting.setting_key))]
pub async fn insert_setting(conn: &mut DbConnection, setting: &NewSetting) -> DbResult<i64> {
    conn.insert(&setting_insert(setting).build()).await
}

/// ## Summary
/// Inserts a setting unless the key is taken. Returns whether a row was added.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn, setting), fields(key = %setting.setting_key))]
pub async fn ensure_setting(conn: &mut DbConnection, setting: &NewSetting) -> DbResult<bool> {
    let stmt = setting_insert(setting).or_ignore().build();
    Ok(conn.execute(&stmt).await?.rows_affected() > 0)
}

/// ## Summary
/// Replaces a setting's value, and its description when one is given.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn, changes))]
pub async fn update_setting(
    conn: &mut DbConnection,
    key: &str,
    changes: &SettingChanges,
) -> DbResult<UpdateOutcome> {
    UpdateQuery::new(SETTING_TABLE)
        .set(SettingColumn::SettingValue, Some(changes.setting_value.as_str()))
        .set(SettingColumn::Description, changes.description.as_deref())
        .touch(SettingColumn::UpdatedAt)
        .apply(conn, SettingColumn::SettingKey, key)
        .await
}

/// ## Summary
/// Deletes a setting by key. Returns whether it existed.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn))]
pub async fn delete_setting(conn: &mut DbConnection, key: &str) -> DbResult<bool> {
    let stmt = Statement::new("DELETE FROM system_settings WHERE setting_key = ?").bind(key);
    Ok(conn.execute(&stmt).await?.rows_affected() > 0)
}

/// ## Summary
/// Appends an audit log entry and returns its id.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn, entry), fields(log_type = %entry.log_type))]
pub async fn insert_log(conn: &mut DbConnection, entry: &NewLog) -> DbResult<i64> {
    let stmt = InsertQuery::new(LOG_TABLE)
        .value(LogColumn::UserId, entry.user_id)
        .value(LogColumn::LogLevel, entry.log_level)
        .value(LogColumn::LogType, entry.log_type.as_str())
        .value(LogColumn::Message, entry.message.as_str())
        .value(LogColumn::IpAddress, entry.ip_address.as_deref())
        .value(LogColumn::UserAgent, entry.user_agent.as_deref())
        .value(LogColumn::AdditionalData, entry.additional_data.as_deref())
        .build();
    conn.insert(&stmt).await
}

/// ## Summary
/// Lists log entries matching every present filter, newest first.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn list_logs(
    conn: &mut DbConnection,
    filter: &LogFilter,
    page: Page,
) -> DbResult<Vec<SystemLog>> {
    let stmt = SelectQuery::new(LOG_SELECT, LogColumn::Id)
        .projection(SystemLog::COLUMNS)
        .where_eq(LogColumn::LogLevel, filter.log_level)
        .where_eq(LogColumn::LogType, filter.log_type.as_deref())
        .where_eq(LogColumn::UserId, filter.user_id)
        .filter(LogColumn::CreatedAt, Op::GtEq, filter.start_date)
        .filter(LogColumn::CreatedAt, Op::LtEq, filter.end_date)
        .order_by(LogColumn::CreatedAt, Direction::Desc)
        .build(page);
    conn.fetch_all(&stmt).await
}

/// ## Summary
/// Deletes log entries older than `days` days. Returns how many were removed.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn))]
pub async fn delete_logs_older_than(conn: &mut DbConnection, days: u32) -> DbResult<u64> {
    let stmt = Statement::new("DELETE FROM system_logs WHERE created_at < datetime('now', ?)")
        .bind(format!("-{days} days"));
    Ok(conn.execute(&stmt).await?.rows_affected())
}

fn backup_query() -> SelectQuery<BackupColumn> {
    SelectQuery::new(BACKUP_SELECT, BackupColumn::Id).projection(BackupRecord::COLUMNS)
}

/// ## Summary
/// Records a backup and returns its id.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn, backup), fields(filename = %backup.filename))]
pub async fn insert_backup(conn: &mut DbConnection, backup: &NewBackup) -> DbResult<i64> {
    let stmt = InsertQuery::new(BACKUP_TABLE)
        .value(BackupColumn::Filename, backup.filename.as_str())
        .value(BackupColumn::FileSize, backup.file_size)
        .value(BackupColumn::BackupType, backup.backup_type)
        .value(BackupColumn::Status, backup.status)
        .value(BackupColumn::CreatedBy, backup.created_by)
        .build();
    conn.insert(&stmt).await
}

/// ## Summary
/// Lists backup records, newest first.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn list_backups(conn: &mut DbConnection, page: Page) -> DbResult<Vec<BackupRecord>> {
    let stmt = backup_query()
        .order_by(BackupColumn::CreatedAt, Direction::Desc)
        .build(page);
    conn.fetch_all(&stmt).await
}

/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn find_backup(conn: &mut DbConnection, id: i64) -> DbResult<Option<BackupRecord>> {
    let stmt = backup_query()
        .where_eq(BackupColumn::Id, Some(id))
        .build_all();
    conn.fetch_optional(&stmt).await
}

/// ## Summary
/// Moves a backup record to a new status.
///
/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn))]
pub async fn update_backup_status(
    conn: &mut DbConnection,
    id: i64,
    status: BackupStatus,
) -> DbResult<UpdateOutcome> {
    UpdateQuery::new(BACKUP_TABLE)
        .set(BackupColumn::Status, Some(status))
        .apply(conn, BackupColumn::Id, id)
        .await
}

/// ## Errors
/// Returns storage failures.
#[tracing::instrument(skip(conn))]
pub async fn delete_backup(conn: &mut DbConnection, id: i64) -> DbResult<bool> {
    let stmt = Statement::new("DELETE FROM backup_history WHERE id = ?").bind(id);
    Ok(conn.execute(&stmt).await?.rows_affected() > 0)
}

/// ## Summary
/// Headline counts for the current calendar month, in one round trip.
///
/// ## Errors
/// Returns storage or decode failures.
#[tracing::instrument(skip(conn))]
pub async fn dashboard_stats(conn: &mut DbConnection) -> DbResult<DashboardStats> {
    let stmt = Statement::new(DASHBOARD_SQL).with_projection(DASHBOARD_COLUMNS);
    conn.fetch_optional(&stmt)
        .await?
        .ok_or_else(|| DbError::DecodeError("dashboard query returned no rows".to_string()))
}
