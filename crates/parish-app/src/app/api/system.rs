use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};
use serde::Serialize;

use parish_core::constants::DEFAULT_LOG_PAGE_LIMIT;
use parish_db::model::system::{
    BackupRecord, BackupStatusChange, DashboardStats, LogFilter, LogRetention, NewBackup, NewLog,
    NewSetting, SettingChanges, SystemLog, SystemSetting,
};

use crate::app::api::SYSTEM_ROUTE_COMPONENT;
use crate::app::api::extract::{json_body, page, page_with_default, path_id, path_text, query};
use crate::app::api::response::{Created, Done, created, done};
use crate::error::AppResult;
use crate::services_handler::get_services_from_depot;

/// Body returned by the log cleanup endpoint.
#[derive(Debug, Serialize)]
struct Cleared {
    message: &'static str,
    deleted: u64,
}

/// GET /system/dashboard/stats
#[handler]
async fn dashboard_stats(depot: &mut Depot) -> AppResult<Json<DashboardStats>> {
    let services = get_services_from_depot(depot)?;
    Ok(Json(services.system.dashboard().await?))
}

/// GET /system/settings
#[handler]
async fn list_settings(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<SystemSetting>>> {
    let services = get_services_from_depot(depot)?;
    let page = page(req, depot)?;
    Ok(Json(services.system.list_settings(page).await?))
}

/// POST /system/settings
#[handler]
async fn create_setting(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Created>> {
    let services = get_services_from_depot(depot)?;
    let payload: NewSetting = json_body(req).await?;
    let id = services.system.create_setting(&payload).await?;
    Ok(created("System setting created", id))
}

/// GET /system/settings/{setting_key}
#[handler]
async fn get_setting(req: &mut Request, depot: &mut Depot) -> AppResult<Json<SystemSetting>> {
    let services = get_services_from_depot(depot)?;
    let key = path_text(req, "setting_key")?;
    Ok(Json(services.system.get_setting(&key).await?))
}

/// PUT /system/settings/{setting_key}
#[handler]
async fn update_setting(req: &mut Request, depot: &mut Depot) -> AppResult<Json<SystemSetting>> {
    let services = get_services_from_depot(depot)?;
    let key = path_text(req, "setting_key")?;
    let changes: SettingChanges = json_body(req).await?;
    Ok(Json(services.system.update_setting(&key, &changes).await?))
}

/// DELETE /system/settings/{setting_key}
#[handler]
async fn delete_setting(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Done>> {
    let services = get_services_from_depot(depot)?;
    let key = path_text(req, "setting_key")?;
    services.system.delete_setting(&key).await?;
    Ok(done("System setting deleted"))
}

/// ## Summary
/// GET /system/logs
///
/// Accepts `log_level`, `log_type`, `user_id`, `start_date` and `end_date`
/// alongside `skip`/`limit`. Returns 50 entries unless told otherwise.
#[handler]
async fn list_logs(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<SystemLog>>> {
    let services = get_services_from_depot(depot)?;
    let filter: LogFilter = query(req)?;
    let page = page_with_default(req, depot, DEFAULT_LOG_PAGE_LIMIT)?;
    Ok(Json(services.system.list_logs(&filter, page).await?))
}

/// POST /system/logs
#[handler]
async fn create_log(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Created>> {
    let services = get_services_from_depot(depot)?;
    let payload: NewLog = json_body(req).await?;
    let id = services.system.create_log(&payload).await?;
    Ok(created("System log created", id))
}

/// DELETE /system/logs/cleanup?days=
#[handler]
async fn cleanup_logs(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Cleared>> {
    let services = get_services_from_depot(depot)?;
    let retention: LogRetention = query(req)?;
    let deleted = services.system.clear_logs(retention).await?;
    Ok(Json(Cleared {
        message: "Old system logs deleted",
        deleted,
    }))
}

/// GET /system/backups
#[handler]
async fn list_backups(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<BackupRecord>>> {
    let services = get_services_from_depot(depot)?;
    let page = page(req, depot)?;
    Ok(Json(services.system.list_backups(page).await?))
}

/// POST /system/backups
#[handler]
async fn create_backup(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Created>> {
    let services = get_services_from_depot(depot)?;
    let payload: NewBackup = json_body(req).await?;
    let id = services.system.create_backup(&payload).await?;
    Ok(created("Backup recorded", id))
}

/// PUT /system/backups/{backup_id}/status
#[handler]
async fn update_backup_status(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Done>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "backup_id")?;
    let change: BackupStatusChange = json_body(req).await?;
    let backup = services.system.update_backup_status(id, change).await?;
    tracing::info!(backup_id = backup.id, status = ?backup.status, "Backup status updated");
    Ok(done("Backup status updated"))
}

/// DELETE /system/backups/{backup_id}
#[handler]
async fn delete_backup(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Done>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "backup_id")?;
    services.system.delete_backup(id).await?;
    Ok(done("Backup deleted"))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(SYSTEM_ROUTE_COMPONENT)
        .push(Router::with_path("dashboard/stats").get(dashboard_stats))
        .push(
            Router::with_path("settings")
                .get(list_settings)
                .post(create_setting)
                .push(
                    Router::with_path("{setting_key}")
                        .get(get_setting)
                        .put(update_setting)
                        .delete(delete_setting),
                ),
        )
        .push(
            Router::with_path("logs")
                .get(list_logs)
                .post(create_log)
                .push(Router::with_path("cleanup").delete(cleanup_logs)),
        )
        .push(
            Router::with_path("backups")
                .get(list_backups)
                .post(create_backup)
                .push(
                    Router::with_path("{backup_id:num}")
                        .delete(delete_backup)
                        .push(Router::with_path("status").put(update_backup_status)),
                ),
        )
}
