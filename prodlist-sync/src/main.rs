//! # Prodlist Sync
//!
//! Offline maintenance commands for the prodlist database.
//!
//! ## Usage
//!
//! ```bash
//! # Refresh stored products from the catalog
//! prodlist-sync sync-products
//!
//! # Create an administrator and print its API token
//! prodlist-sync create-admin -e admin@example.com -n "Admin" -p secret
//!
//! # Create the database if needed and apply migrations
//! prodlist-sync migrate
//! ```
//!
//! `DATABASE_URL`, `CATALOG_BASE_URL` and `CATALOG_TIMEOUT_SECONDS` are read
//! from the environment (and `.env`); flags take precedence.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "prodlist-sync")]
#[command(version, about = "Prodlist maintenance commands")]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Refresh locally stored products from the catalog
    SyncProducts {
        /// Catalog service base URL
        #[arg(long, env = "CATALOG_BASE_URL", default_value = prodlist_shared::catalog::DEFAULT_BASE_URL)]
        catalog_url: String,

        /// Per-request timeout; unbounded when unset
        #[arg(long, env = "CATALOG_TIMEOUT_SECONDS")]
        timeout_seconds: Option<u64>,
    },

    /// Create an administrator account and print its API token
    CreateAdmin {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        name: String,

        #[arg(short, long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create the database if missing and apply migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prodlist_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        return Err(e);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let database_url = cli
        .database_url
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set or passed with --database-url"))?;

    match cli.command {
        Command::SyncProducts {
            catalog_url,
            timeout_seconds,
        } => {
            let report =
                commands::sync::run(&database_url, &catalog_url, timeout_seconds).await?;
            println!(
                "Products updated: {}, skipped: {}",
                report.updated, report.skipped
            );
        }
        Command::CreateAdmin {
            email,
            name,
            password,
        } => {
            let token = commands::admin::create(&database_url, &email, &name, &password).await?;
            println!("{}", token);
        }
        Command::Migrate => commands::migrate::run(&database_url).await?,
    }

    Ok(())
}
