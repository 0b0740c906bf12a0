use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreatePlanRequest, GeneratePlanRequest, PlanDetail, PlanSummary};
use super::services;
use crate::{auth::extractors::OnboardedUser, error::AppError, state::AppState};

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list).post(create))
        .route("/plans/generate", post(generate))
        .route("/plans/:id", get(show).delete(remove))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
) -> Result<Json<Vec<PlanSummary>>, AppError> {
    Ok(Json(services::list_plans(&state, user).await?))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
    Json(payload): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanDetail>), AppError> {
    let plan = services::create_plan(&state, user, payload).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanDetail>, AppError> {
    Ok(Json(services::get_plan(&state, user, id).await?))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    services::delete_plan(&state, user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn generate(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
    payload: Option<Json<GeneratePlanRequest>>,
) -> Result<(StatusCode, Json<PlanDetail>), AppError> {
    let days = payload.and_then(|Json(p)| p.days);
    let plan = services::generate_plan(&state, user, days).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}
