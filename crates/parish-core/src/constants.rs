/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const API_VERSION_COMPONENT: &str = "v1";
pub const API_V1_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", API_VERSION_COMPONENT);

pub const FAMILIES_ROUTE_COMPONENT: &str = "families";
pub const MEMBERS_ROUTE_COMPONENT: &str = "members";
pub const OFFERINGS_ROUTE_COMPONENT: &str = "offerings";
pub const PRAYERS_ROUTE_COMPONENT: &str = "prayers";
pub const SYSTEM_ROUTE_COMPONENT: &str = "system";

/// Role assigned when a member joins a family without an explicit role.
pub const DEFAULT_FAMILY_ROLE: &str = "자녀";

/// Position assigned to newly registered members.
pub const DEFAULT_MEMBER_POSITION: &str = "성도";

/// Age threshold used when clearing old system logs without an explicit value.
pub const DEFAULT_LOG_RETENTION_DAYS: u32 = 90;

/// Page size for the system log listing when no `limit` is given.
pub const DEFAULT_LOG_PAGE_LIMIT: u32 = 50;

pub const MIN_SUMMARY_YEAR: i32 = 2000;
pub const MAX_SUMMARY_YEAR: i32 = 2100;
