use std::sync::Arc;

mod app;
mod auth;
mod config;
mod db;
mod error;
mod response;
mod state;
mod users;
mod validation;

use crate::{
    config::AppConfig,
    state::AppState,
    users::repo::{AccountStore, PgAccountStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "usermgmt=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        e
    })?;

    let db = db::connect(&config).await?;
    tracing::info!("database connection established");

    let host = config.host.clone();
    let port = config.port;
    let accounts = Arc::new(PgAccountStore::new(db.clone())) as Arc<dyn AccountStore>;
    let app_state = AppState::from_parts(config, accounts);
    let app = app::build_app(app_state)?;

    let served = app::serve(app, &host, port).await;
    db.close().await;
    tracing::info!("database connection closed");
    served
}
