mod ai;
mod app;
mod auth;
mod catalog;
mod clock;
mod config;
mod dashboard;
mod error;
mod food_logs;
mod nutrition;
mod plans;
mod state;
mod tracking;
mod users;
mod workout_logs;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "nutriai=debug,axum=info,tower_http=info".to_string());
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

    let state = state::AppState::init().await?;

    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .context("run migrations")?;

    if state.config.seed_catalog {
        catalog::seed::seed_catalog(&state.db).await?;
    }

    tracing::info!(tz = %state.calendar.tz(), "starting nutriai");
    app::serve(app::build_app(state)).await
}
