//! Seeds reference data, an optional administrator account and, with
//! `--sample`, a small demo congregation.
//!
//! The administrator is created only when `PARISH_ADMIN_PASSWORD` is set;
//! `PARISH_ADMIN_USERNAME` and `PARISH_ADMIN_EMAIL` override the defaults.

use parish_core::config::load_config;
use parish_db::db::connection::create_provider;
use parish_service::seed::{AdminAccount, Seeder};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_EMAIL: &str = "admin@parish.local";

fn admin_from_env() -> Option<AdminAccount> {
    let password = std::env::var("PARISH_ADMIN_PASSWORD").ok()?;
    Some(AdminAccount {
        email: std::env::var("PARISH_ADMIN_EMAIL")
            .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string()),
        username: std::env::var("PARISH_ADMIN_USERNAME")
            .unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_string()),
        password,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false))
        .init();

    let with_sample = std::env::args().skip(1).any(|arg| arg == "--sample");

    let config = load_config()?;
    let provider = create_provider(&config.database).await?;
    let seeder = Seeder::new(provider);

    let mut report = seeder.reference_data().await?;
    tracing::info!(?report, "Reference data seeded");

    let admin_id = match admin_from_env() {
        Some(account) => {
            let (id, created) = seeder.admin(&account).await?;
            report.admin_created = created;
            tracing::info!(username = %account.username, created, "Administrator ready");
            Some(id)
        }
        None => {
            tracing::warn!("PARISH_ADMIN_PASSWORD is not set, skipping administrator account");
            None
        }
    };

    if with_sample {
        match admin_id {
            Some(created_by) => {
                report.sample_members = seeder.sample_data(created_by).await?;
                tracing::info!(members = report.sample_members, "Sample data seeded");
            }
            None => anyhow::bail!("--sample needs an administrator; set PARISH_ADMIN_PASSWORD"),
        }
    }

    tracing::info!(?report, "Seeding finished");
    Ok(())
}
