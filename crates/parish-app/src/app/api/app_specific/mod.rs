// Endpoints that belong to the service itself rather than a domain resource.

use salvo::Router;

mod healthcheck;

#[must_use]
pub fn routes() -> Router {
    Router::with_path("app").push(healthcheck::routes())
}
