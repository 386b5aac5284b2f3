use std::sync::Arc;

use parish_db::db::DbProvider;

use crate::family::FamilyService;
use crate::member::MemberService;
use crate::offering::OfferingService;
use crate::prayer::PrayerService;
use crate::system::SystemService;

/// Every domain service, built once at startup over a shared storage provider.
#[derive(Clone)]
pub struct Services {
    pub families: FamilyService,
    pub members: MemberService,
    pub offerings: OfferingService,
    pub prayers: PrayerService,
    pub system: SystemService,
}

impl Services {
    #[must_use]
    pub fn new(db: &Arc<dyn DbProvider>) -> Self {
        Self {
            families: FamilyService::new(Arc::clone(db)),
            members: MemberService::new(Arc::clone(db)),
            offerings: OfferingService::new(Arc::clone(db)),
            prayers: PrayerService::new(Arc::clone(db)),
            system: SystemService::new(Arc::clone(db)),
        }
    }
}
