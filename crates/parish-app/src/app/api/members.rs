use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};

use parish_db::model::member::{Member, MemberChanges, MemberFilter, NewMember};

use crate::app::api::MEMBERS_ROUTE_COMPONENT;
use crate::app::api::extract::{json_body, page, path_id, query};
use crate::app::api::response::{Created, Done, created, done};
use crate::error::AppResult;
use crate::services_handler::get_services_from_depot;

/// ## Summary
/// GET /members
///
/// Accepts `name` (substring), `district`, `position`, `family_id` and `is_active`
/// alongside `skip`/`limit`.
#[handler]
async fn list_members(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<Member>>> {
    let services = get_services_from_depot(depot)?;
    let filter: MemberFilter = query(req)?;
    let page = page(req, depot)?;
    Ok(Json(services.members.list(&filter, page).await?))
}

/// POST /members
#[handler]
async fn create_member(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Created>> {
    let services = get_services_from_depot(depot)?;
    let payload: NewMember = json_body(req).await?;
    let id = services.members.create(&payload).await?;
    Ok(created("Member created", id))
}

/// GET /members/{member_id}
#[handler]
async fn get_member(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Member>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "member_id")?;
    Ok(Json(services.members.get(id).await?))
}

/// PUT /members/{member_id}
#[handler]
async fn update_member(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Member>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "member_id")?;
    let changes: MemberChanges = json_body(req).await?;
    Ok(Json(services.members.update(id, &changes).await?))
}

/// DELETE /members/{member_id}
#[handler]
async fn delete_member(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Done>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "member_id")?;
    services.members.delete(id).await?;
    Ok(done("Member deleted"))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(MEMBERS_ROUTE_COMPONENT)
        .get(list_members)
        .post(create_member)
        .push(
            Router::with_path("{member_id:num}")
                .get(get_member)
                .put(update_member)
                .delete(delete_member),
        )
}
