use anyhow::Result;
use config::Config;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub pagination: PaginationConfig,
}

#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `libsql://`, `https://` or `http://` for the hosted store, `sqlite:` for a local file
    /// or `sqlite::memory:`.
    pub url: String,
    pub auth_token: Option<String>,
    pub max_connections: u8,
    /// Apply the bundled `CREATE TABLE IF NOT EXISTS` schema on startup.
    pub apply_schema: bool,
    /// Transport timeout for the hosted store. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .field("apply_schema", &self.apply_schema)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the bind address in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration into a `Settings`.
    ///
    /// Sources, lowest precedence first: built-in defaults, an optional `config.toml`,
    /// `PARISH__SECTION__KEY` environment variables, and finally `LIBSQL_URL` /
    /// `LIBSQL_AUTH_TOKEN` for the hosted store.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("database.max_connections", 4)?
            .set_default("database.apply_schema", false)?
            .set_default("logging.level", "info")?
            .set_default("pagination.default_limit", 20)?
            .set_default("pagination.max_limit", 100)?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env
            .add_source(
                config::Environment::with_prefix("PARISH")
                    .prefix_separator("__")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .set_override_option("database.url", std::env::var("LIBSQL_URL").ok())?
            .set_override_option(
                "database.auth_token",
                std::env::var("LIBSQL_AUTH_TOKEN").ok(),
            )?
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
