//! Clinic - hospital staff records API server

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::{path::Path, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_backend::{
    api::create_router,
    auth::{AuthState, JwtHandler, StaticCredentials},
    config::Config,
    db::HospitalDb,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Environment first so clap can pick up `.env` values
    load_env();
    init_tracing();

    let config = Config::parse();

    info!("Clinic records service starting");

    let db_path = config.resolved_db_path();
    let db = Arc::new(HospitalDb::open(&db_path, config.store_options())?);
    info!("Database initialized at: {}", db_path);

    if config.uses_dev_secret() {
        warn!("JWT_SECRET not set, using development secret. CHANGE IT IN PRODUCTION!");
    }
    let jwt_handler =
        Arc::new(JwtHandler::new(config.jwt_secret.clone()).with_ttl(config.token_ttl()));
    let auth_state = AuthState::new(Arc::new(StaticCredentials::default()), jwt_handler);

    let app = create_router(db, auth_state);

    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("API server listening on {}", config.bind);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clinic_backend=debug,clinic=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate directory when launched from elsewhere
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
