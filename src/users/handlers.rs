use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use super::dto::{GoalsRequest, GoalsResponse, UpdateProfileRequest, UserProfile};
use super::model::User;
use crate::{auth::extractors::OnboardedUser, error::AppError, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/me", get(get_me).put(update_me))
        .route("/user/goals", get(get_goals).post(set_goals))
}

async fn load(state: &AppState, user: &OnboardedUser) -> Result<User, AppError> {
    User::find_by_id(&state.db, user.0.id)
        .await?
        .ok_or(AppError::NotFound("User"))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    user: OnboardedUser,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(load(&state, &user).await?.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    user: OnboardedUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let mut current = load(&state, &user).await?;
    payload.apply(&mut current)?;
    let saved = User::save_profile(&state.db, &current).await?;
    info!(user_id = %saved.id, "profile updated");
    Ok(Json(saved.into()))
}

#[instrument(skip(state))]
pub async fn get_goals(
    State(state): State<AppState>,
    user: OnboardedUser,
) -> Result<Json<GoalsResponse>, AppError> {
    let current = load(&state, &user).await?;
    Ok(Json(GoalsResponse::from(&current)))
}

#[instrument(skip(state, payload))]
pub async fn set_goals(
    State(state): State<AppState>,
    user: OnboardedUser,
    Json(payload): Json<GoalsRequest>,
) -> Result<Json<GoalsResponse>, AppError> {
    if matches!(payload.target_weight, Some(w) if w <= 0.0) {
        return Err(AppError::BadRequest("target_weight must be positive".into()));
    }
    let mut current = load(&state, &user).await?;
    current.goals = Some(payload.goals.as_str().to_string());
    current.target_weight = payload.target_weight;
    let saved = User::save_profile(&state.db, &current).await?;
    info!(user_id = %saved.id, goals = ?saved.goals, "goals updated");
    Ok(Json(GoalsResponse::from(&saved)))
}
