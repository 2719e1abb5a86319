//! rosterd - Postgres-backed user roster service
//!
//! Connects to the database, applies pending SQL file migrations, then
//! serves /health and /users until SIGTERM/Ctrl+C.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rosterd_server::{db, ServerConfig};
use tracing::info;

mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "rosterd",
    author,
    version,
    about = "Minimal user roster service over PostgreSQL"
)]
struct Cli {
    /// Port to bind the HTTP server to (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Postgres connection string (overrides DATABASE_URL / DB_*)
    #[arg(long)]
    database_url: Option<String>,

    /// Directory holding .sql migration files
    #[arg(long)]
    migrations_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init_tracing(cli.debug)?;

    let mut config = ServerConfig::from_env();
    if let Some(port) = cli.port {
        config.bind_addr = SocketAddr::new(config.bind_addr.ip(), port);
    }
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }
    if let Some(dir) = cli.migrations_dir {
        config.migrations_dir = dir;
    }

    let pool = db::create_pool(&config.database_url, config.max_connections)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    let applied = db::apply_all(&pool, &config.migrations_dir)
        .await
        .context("failed to run migrations")?;
    info!(applied, "Migrations completed");

    rosterd_server::run_server(pool, config)
        .await
        .context("server error")?;

    Ok(())
}
