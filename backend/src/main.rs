//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use safety_backend::AppSettings;
use safety_backend::inbound::http::health::HealthState;
use safety_backend::inbound::http::session_config::{
    BuildMode, key_fingerprint, session_settings_from_env,
};
use safety_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("load settings")?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("load session settings")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session signing key loaded"
    );

    let database_url = settings.database_url().map(str::to_owned);
    let mut config = ServerConfig::new(session, settings);
    if let Some(url) = database_url {
        run_migrations(&url).await.wrap_err("apply migrations")?;
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .wrap_err("create database pool")?;
        config = config.with_db_pool(pool);
    }

    let bind_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("start server")?;
    info!(%bind_addr, "listening");
    server.await.wrap_err("server failed")
}
