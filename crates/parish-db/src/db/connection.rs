use std::sync::Arc;
use std::time::Duration;

use parish_core::config::DatabaseConfig;

use crate::db::DbProvider;
use crate::db::local::LocalDb;
use crate::db::remote::RemoteDb;
use crate::db::schema;

/// Which backend a database URL selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Local,
    Remote,
}

impl Backend {
    #[must_use]
    pub fn for_url(url: &str) -> Self {
        if url.trim_start().starts_with("sqlite:") {
            Self::Local
        } else {
            Self::Remote
        }
    }
}

/// ## Summary
/// Creates the storage provider described by `config`, optionally bootstrapping the schema.
///
/// ## Errors
/// Returns an error if the URL is unsupported, the local database cannot be opened,
/// or applying the schema fails.
#[tracing::instrument(skip(config), fields(max_connections = config.max_connections))]
pub async fn create_provider(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn DbProvider>> {
    let backend = Backend::for_url(&config.url);
    tracing::debug!(?backend, "Creating database provider");

    let provider: Arc<dyn DbProvider> = match backend {
        Backend::Local => {
            Arc::new(LocalDb::connect(&config.url, u32::from(config.max_connections)).await?)
        }
        Backend::Remote => Arc::new(RemoteDb::new(
            &config.url,
            config.auth_token.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )?),
    };

    if config.apply_schema {
        let mut conn = provider.get_connection().await?;
        schema::apply(&mut conn).await?;
    }

    tracing::info!(?backend, "Database provider created successfully");

    Ok(provider)
}
