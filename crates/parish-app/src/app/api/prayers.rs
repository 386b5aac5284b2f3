use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};

use parish_db::model::prayer::{
    NewPrayer, NewPrayerCategory, NewPrayerComment, Participation, Prayer, PrayerCategory,
    PrayerChanges, PrayerComment, PrayerFilter, PrayerParticipant,
};

use crate::app::api::PRAYERS_ROUTE_COMPONENT;
use crate::app::api::extract::{json_body, page, path_id, query, required_query};
use crate::app::api::response::{Created, Done, created, done};
use crate::error::AppResult;
use crate::services_handler::get_services_from_depot;

/// GET /prayers/categories?active_only=
#[handler]
async fn list_categories(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<Vec<PrayerCategory>>> {
    let services = get_services_from_depot(depot)?;
    let active_only = req.query::<bool>("active_only").unwrap_or(true);
    Ok(Json(services.prayers.list_categories(active_only).await?))
}

/// POST /prayers/categories
#[handler]
async fn create_category(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Created>> {
    let services = get_services_from_depot(depot)?;
    let payload: NewPrayerCategory = json_body(req).await?;
    let id = services.prayers.create_category(&payload).await?;
    Ok(created("Prayer category created", id))
}

/// ## Summary
/// GET /prayers
///
/// Accepts `category`, `status`, `visibility` and `user_id` (the author)
/// alongside `skip`/`limit`.
#[handler]
async fn list_prayers(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<Prayer>>> {
    let services = get_services_from_depot(depot)?;
    let filter: PrayerFilter = query(req)?;
    let page = page(req, depot)?;
    Ok(Json(services.prayers.list(&filter, page).await?))
}

/// POST /prayers
#[handler]
async fn create_prayer(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Created>> {
    let services = get_services_from_depot(depot)?;
    let payload: NewPrayer = json_body(req).await?;
    let id = services.prayers.create(&payload).await?;
    Ok(created("Prayer request created", id))
}

/// GET /prayers/{prayer_id}
#[handler]
async fn get_prayer(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Prayer>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "prayer_id")?;
    Ok(Json(services.prayers.get(id).await?))
}

/// PUT /prayers/{prayer_id}
#[handler]
async fn update_prayer(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Prayer>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "prayer_id")?;
    let changes: PrayerChanges = json_body(req).await?;
    Ok(Json(services.prayers.update(id, &changes).await?))
}

/// DELETE /prayers/{prayer_id}
#[handler]
async fn delete_prayer(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Done>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "prayer_id")?;
    services.prayers.delete(id).await?;
    Ok(done("Prayer request deleted"))
}

/// ## Summary
/// POST /prayers/{prayer_id}/participate
///
/// Joining twice is not an error; the existing participation id is returned.
#[handler]
async fn participate(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Created>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "prayer_id")?;
    let participation: Participation = json_body(req).await?;
    let participation_id = services
        .prayers
        .participate(id, participation.user_id)
        .await?;
    Ok(created("Joined in prayer", participation_id))
}

/// GET /prayers/{prayer_id}/participants
#[handler]
async fn list_participants(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<Vec<PrayerParticipant>>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "prayer_id")?;
    Ok(Json(services.prayers.participants(id).await?))
}

/// POST /prayers/{prayer_id}/comments
#[handler]
async fn create_comment(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Created>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "prayer_id")?;
    let payload: NewPrayerComment = json_body(req).await?;
    let comment_id = services.prayers.add_comment(id, &payload).await?;
    Ok(created("Comment created", comment_id))
}

/// GET /prayers/{prayer_id}/comments
#[handler]
async fn list_comments(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<PrayerComment>>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "prayer_id")?;
    Ok(Json(services.prayers.comments(id).await?))
}

/// ## Summary
/// DELETE /prayers/comments/{comment_id}?user_id=
///
/// Only the author may delete a comment; anyone else gets a 404.
#[handler]
async fn delete_comment(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Done>> {
    let services = get_services_from_depot(depot)?;
    let comment_id = path_id(req, "comment_id")?;
    let user_id: i64 = required_query(req, "user_id")?;
    services.prayers.delete_comment(comment_id, user_id).await?;
    Ok(done("Comment deleted"))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(PRAYERS_ROUTE_COMPONENT)
        .get(list_prayers)
        .post(create_prayer)
        .push(
            Router::with_path("categories")
                .get(list_categories)
                .post(create_category),
        )
        .push(Router::with_path("comments/{comment_id:num}").delete(delete_comment))
        .push(
            Router::with_path("{prayer_id:num}")
                .get(get_prayer)
                .put(update_prayer)
                .delete(delete_prayer)
                .push(Router::with_path("participate").post(participate))
                .push(Router::with_path("participants").get(list_participants))
                .push(
                    Router::with_path("comments")
                        .get(list_comments)
                        .post(create_comment),
                ),
        )
}
