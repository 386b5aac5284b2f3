use chrono::NaiveDate;
use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};
use serde::Deserialize;

use parish_db::model::offering::{
    MemberOfferingSummary, NewOffering, NewOfferingType, Offering, OfferingChanges,
    OfferingFilter, OfferingStatistics, OfferingType,
};

use crate::app::api::OFFERINGS_ROUTE_COMPONENT;
use crate::app::api::extract::{json_body, page, path_id, query, required_query};
use crate::app::api::response::{Created, Done, created, done};
use crate::error::AppResult;
use crate::services_handler::get_services_from_depot;

/// Query of the period statistics endpoint. Both bounds are inclusive.
#[derive(Debug, Deserialize)]
struct PeriodQuery {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

/// GET /offerings/types?active_only=
#[handler]
async fn list_offering_types(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<Vec<OfferingType>>> {
    let services = get_services_from_depot(depot)?;
    let active_only = req.query::<bool>("active_only").unwrap_or(true);
    Ok(Json(services.offerings.list_types(active_only).await?))
}

/// POST /offerings/types
#[handler]
async fn create_offering_type(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Created>> {
    let services = get_services_from_depot(depot)?;
    let payload: NewOfferingType = json_body(req).await?;
    let id = services.offerings.create_type(&payload).await?;
    Ok(created("Offering type created", id))
}

/// ## Summary
/// GET /offerings
///
/// Accepts `member_id`, `offering_type`, `start_date`, `end_date`, `min_amount`
/// and `max_amount` alongside `skip`/`limit`.
#[handler]
async fn list_offerings(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<Offering>>> {
    let services = get_services_from_depot(depot)?;
    let filter: OfferingFilter = query(req)?;
    let page = page(req, depot)?;
    Ok(Json(services.offerings.list(&filter, page).await?))
}

/// POST /offerings
#[handler]
async fn create_offering(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Created>> {
    let services = get_services_from_depot(depot)?;
    let payload: NewOffering = json_body(req).await?;
    let id = services.offerings.create(&payload).await?;
    Ok(created("Offering recorded", id))
}

/// GET /offerings/{offering_id}
#[handler]
async fn get_offering(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Offering>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "offering_id")?;
    Ok(Json(services.offerings.get(id).await?))
}

/// PUT /offerings/{offering_id}
#[handler]
async fn update_offering(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Offering>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "offering_id")?;
    let changes: OfferingChanges = json_body(req).await?;
    Ok(Json(services.offerings.update(id, &changes).await?))
}

/// DELETE /offerings/{offering_id}
#[handler]
async fn delete_offering(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Done>> {
    let services = get_services_from_depot(depot)?;
    let id = path_id(req, "offering_id")?;
    services.offerings.delete(id).await?;
    Ok(done("Offering deleted"))
}

/// GET /offerings/statistics/period?start_date=&end_date=
#[handler]
async fn period_statistics(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<OfferingStatistics>> {
    let services = get_services_from_depot(depot)?;
    let period: PeriodQuery = query(req)?;
    Ok(Json(
        services
            .offerings
            .statistics(period.start_date, period.end_date)
            .await?,
    ))
}

/// GET /offerings/statistics/member/{member_id}?year=
#[handler]
async fn member_statistics(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<Vec<MemberOfferingSummary>>> {
    let services = get_services_from_depot(depot)?;
    let member_id = path_id(req, "member_id")?;
    let year: i32 = required_query(req, "year")?;
    Ok(Json(services.offerings.member_summary(member_id, year).await?))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(OFFERINGS_ROUTE_COMPONENT)
        .get(list_offerings)
        .post(create_offering)
        .push(
            Router::with_path("types")
                .get(list_offering_types)
                .post(create_offering_type),
        )
        .push(
            Router::with_path("statistics")
                .push(Router::with_path("period").get(period_statistics))
                .push(Router::with_path("member/{member_id:num}").get(member_statistics)),
        )
        .push(
            Router::with_path("{offering_id:num}")
                .get(get_offering)
                .put(update_offering)
                .delete(delete_offering),
        )
}
