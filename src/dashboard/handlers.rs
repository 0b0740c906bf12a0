use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::services::{self, DashboardSummary, Trends};
use crate::{auth::extractors::OnboardedUser, clock::DaysQuery, error::AppError, state::AppState};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/summary", get(summary))
        .route("/dashboard/trends", get(trends))
}

#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
    Query(q): Query<DaysQuery>,
) -> Result<Json<DashboardSummary>, AppError> {
    let days = q.resolve()?;
    Ok(Json(services::dashboard_summary(&state, user, days).await?))
}

#[instrument(skip(state))]
pub async fn trends(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
    Query(q): Query<DaysQuery>,
) -> Result<Json<Trends>, AppError> {
    let days = q.resolve()?;
    Ok(Json(services::dashboard_trends(&state, user, days).await?))
}
