use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};

use parish_db::model::family::{Family, FamilyChanges, FamilyMembership, NewFamily};
use parish_db::model::member::Member;

use crate::app::api::FAMILIES_ROUTE_COMPONENT;
use crate::app::api::extract::{json_body, page, path_id};
use crate::app::api::response::{Created, Done, created, done};
use crate::error::AppResult;
use crate::services_handler::get_services_from_depot;

/// GET /families
#[handler]
async fn list_families(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<Family>>> {
    let services = get_services_from_depot(depot)?;
    let page = page(req, depot)?;
    Ok(Json(services.families.list(page).await?))
}

/// POST /families
#[handler]
async fn create_family(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Created>> {
    let services = get_services_from_depot(depot)?;
    let payload: NewFamily = json_body(req).await?;
    let id = services.families.create(&payload).await?;
    Ok(created("Family created", id))
}

/// GET /families/{family_id}
#[handler]
async fn get_family(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Family>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "family_id")?;
    Ok(Json(services.families.get(id).await?))
}

/// ## Summary
/// PUT /families/{family_id}
///
/// Only the fields present in the body change; an empty body returns the family as it is.
#[handler]
async fn update_family(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Family>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "family_id")?;
    let changes: FamilyChanges = json_body(req).await?;
    Ok(Json(services.families.update(id, &changes).await?))
}

/// DELETE /families/{family_id}
#[handler]
async fn delete_family(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Done>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "family_id")?;
    services.families.delete(id).await?;
    Ok(done("Family deleted"))
}

/// GET /families/{family_id}/members
#[handler]
async fn list_family_members(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<Member>>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "family_id")?;
    Ok(Json(services.families.members(id).await?))
}

/// POST /families/{family_id}/members
#[handler]
async fn add_family_member(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Done>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "family_id")?;
    let membership: FamilyMembership = json_body(req).await?;
    services.families.add_member(id, &membership).await?;
    Ok(done("Family member added"))
}

/// DELETE /families/members/{member_id}
#[handler]
async fn remove_family_member(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Done>> {
    let services = get_services_from_depot(depot)?;
    let member_id = path_id(req, "member_id")?;
    services.families.remove_member(member_id).await?;
    Ok(done("Family member removed"))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(FAMILIES_ROUTE_COMPONENT)
        .get(list_families)
        .post(create_family)
        .push(Router::with_path("members/{member_id:num}").delete(remove_family_member))
        .push(
            Router::with_path("{family_id:num}")
                .get(get_family)
                .put(update_family)
                .delete(delete_family)
                .push(
                    Router::with_path("members")
                        .get(list_family_members)
                        .post(add_family_member),
                ),
        )
}
