//! Parish administration server - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can reach
//! every layer through `parish_test::` paths.

pub mod component {
    pub use parish_core::{config, constants, error, page, types, validate};

    // Storage seam, query builders and backends
    pub mod db {
        pub use parish_db::db::*;
        pub use parish_db::error::{DbError, DbResult};
    }

    pub mod model {
        pub use parish_db::model::*;
    }

    pub mod service {
        pub use parish_service::*;
    }
}

pub mod app {
    pub use parish_app::app::*;
    pub use parish_app::config::ConfigHandler;
    pub use parish_app::error::{AppError, ErrorResponse};
    pub use parish_app::services_handler::ServicesHandler;
}
