mod app_specific;
mod extract;
mod families;
mod members;
mod offerings;
mod prayers;
mod response;
mod system;


use salvo::Router;

// Re-export route constants from core
pub use parish_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, API_V1_PREFIX, API_VERSION_COMPONENT,
    FAMILIES_ROUTE_COMPONENT, MEMBERS_ROUTE_COMPONENT, OFFERINGS_ROUTE_COMPONENT,
    PRAYERS_ROUTE_COMPONENT, SYSTEM_ROUTE_COMPONENT,
};

/// ## Summary
/// Constructs the API router: the app-specific endpoints under `/api/app` and
/// the domain resources under `/api/v1`.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(app_specific::routes())
        .push(
            Router::with_path(API_VERSION_COMPONENT)
                .push(families::routes())
                .push(members::routes())
                .push(offerings::routes())
                .push(prayers::routes())
                .push(system::routes()),
        )
}
