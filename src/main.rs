use std::sync::Arc;

mod app;
mod auth;
mod chat;
mod config;
mod dashboard;
mod db;
mod error;
mod state;
#[cfg(test)]
mod testing;
mod transactions;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "fintrack=debug,axum=info,tower_http=info".to_string());
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

    let config = Arc::new(AppConfig::from_env()?);
    let db = db::connect(&config).await?;
    db::migrate(&db).await?;

    let app_state = AppState::init(config, db)?;
    let app = app::build_app(app_state)?;
    app::serve(app).await
}
