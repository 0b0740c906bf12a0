use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{LogWorkoutRequest, WorkoutLogResponse, WorkoutSummary};
use super::services;
use crate::{
    auth::extractors::OnboardedUser,
    clock::{DateQuery, DaysQuery},
    error::AppError,
    state::AppState,
};

pub fn workout_log_routes() -> Router<AppState> {
    Router::new()
        .route("/workout-logs", post(create).get(list))
        .route("/workout-logs/summary", get(summary))
}

#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
    Json(payload): Json<LogWorkoutRequest>,
) -> Result<(StatusCode, Json<WorkoutLogResponse>), AppError> {
    let log = services::log_workout(&state, user, payload).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
    Query(q): Query<DateQuery>,
) -> Result<Json<Vec<WorkoutLogResponse>>, AppError> {
    let date = q.resolve()?;
    Ok(Json(services::list_workout_logs(&state, user, date).await?))
}

#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
    Query(q): Query<DaysQuery>,
) -> Result<Json<WorkoutSummary>, AppError> {
    let days = q.resolve()?;
    Ok(Json(services::workout_summary(&state, user, days).await?))
}
