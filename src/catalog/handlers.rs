use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{FoodQuery, FoodResponse, PaginatedFoods, WorkoutList, WorkoutQuery};
use super::repo;
use crate::{auth::extractors::OnboardedUser, error::AppError, state::AppState};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods))
        .route("/workouts", get(list_workouts))
}

#[instrument(skip(state))]
pub async fn list_foods(
    State(state): State<AppState>,
    OnboardedUser(_user): OnboardedUser,
    Query(q): Query<FoodQuery>,
) -> Result<Json<PaginatedFoods>, AppError> {
    q.validate()?;
    let (total, foods) = repo::list_foods(&state.db, &q).await?;
    Ok(Json(PaginatedFoods {
        total,
        page: q.page,
        per_page: q.per_page,
        items: foods.into_iter().map(FoodResponse::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn list_workouts(
    State(state): State<AppState>,
    OnboardedUser(_user): OnboardedUser,
    Query(q): Query<WorkoutQuery>,
) -> Result<Json<WorkoutList>, AppError> {
    q.validate()?;
    let (total, items) = repo::list_workouts(&state.db, &q).await?;
    Ok(Json(WorkoutList {
        total,
        limit: q.limit,
        offset: q.offset,
        items,
    }))
}
