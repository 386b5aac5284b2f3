use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use parish_core::error::CoreError;
use parish_service::Services;

/// Makes the domain services available to every handler below it.
pub struct ServicesHandler {
    pub services: Arc<Services>,
}

#[async_trait]
impl salvo::Handler for ServicesHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.services));
    }
}

/// ## Summary
/// Retrieves the domain services from the depot.
///
/// ## Errors
/// Returns an error if the services were not injected ahead of the handler.
pub fn get_services_from_depot(depot: &salvo::Depot) -> AppResult<Arc<Services>> {
    depot
        .obtain::<Arc<Services>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Services not found in depot").into())
}
