use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{CreateFoodLogRequest, FoodLogResponse, FoodSummary};
use super::services;
use crate::{
    auth::extractors::OnboardedUser,
    clock::{DateQuery, DaysQuery},
    error::AppError,
    state::AppState,
};

pub fn food_log_routes() -> Router<AppState> {
    Router::new()
        .route("/food-logs", post(create).get(list))
        .route("/food-logs/summary", get(summary))
}

#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
    Json(payload): Json<CreateFoodLogRequest>,
) -> Result<(StatusCode, Json<FoodLogResponse>), AppError> {
    let log = services::create_food_log(&state, user, payload).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
    Query(q): Query<DateQuery>,
) -> Result<Json<Vec<FoodLogResponse>>, AppError> {
    let date = q.resolve()?;
    Ok(Json(services::list_food_logs(&state, user, date).await?))
}

#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
    Query(q): Query<DaysQuery>,
) -> Result<Json<FoodSummary>, AppError> {
    let days = q.resolve()?;
    Ok(Json(services::food_summary(&state, user, days).await?))
}
