//! Kinerja API
//!
//! Performance-planning backend: pohon kinerja trees, rencana kinerja,
//! programs and budgets, OPD goals and master data over PostgreSQL.
//!
//! Startup order:
//! - `.env` and environment configuration
//! - signing keys (JWKS); startup aborts if they cannot be fetched
//! - database pool and schema bootstrap
//! - either the one-shot seeder (`--seed`) or the HTTP server

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod repository;
pub mod seeder;
pub mod service;

use crate::api::AppState;
use crate::auth::{AuthPolicy, Authenticator, JwksStore};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "kinerja-api")]
#[command(about = "Kinerja performance-planning API", long_about = None)]
struct Cli {
    /// Run the database seeder and exit
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine; the environment may already be set
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kinerja_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Kinerja API...");

    let config = Config::from_env()?;

    let jwks = JwksStore::init(&config.jwks_url)
        .await
        .context("Failed to initialize JWKS")?;

    tracing::info!("Connecting to database...");

    let pool = db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to create database pool")?;

    db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    if cli.seed {
        tracing::info!("Running database seeder...");
        seeder::seed_all(&pool).await.context("Seeder failed")?;
        tracing::info!("Seeder finished");
        return Ok(());
    }

    jwks.spawn_refresh();

    let state = AppState {
        pool,
        auth: Authenticator {
            jwks,
            policy: AuthPolicy {
                issuer: config.issuer.clone(),
                allowed_service_client_id: config.allowed_service_client_id.clone(),
            },
        },
    };
    let app = api::create_router(state, &config)?;

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
