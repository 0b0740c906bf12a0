use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::Date;
use tracing::{info, instrument};

use super::repo::{self, CounterKind};
use crate::{
    auth::extractors::OnboardedUser, clock::iso_date, error::AppError, state::AppState,
    users::model::UserContext,
};

pub fn tracking_routes() -> Router<AppState> {
    Router::new()
        .route("/tracking/water/today", get(water_today))
        .route("/tracking/water", post(add_water))
        .route("/tracking/steps/today", get(steps_today))
        .route("/tracking/steps", post(add_steps))
}

#[derive(Debug, Deserialize)]
pub struct AddWater {
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct AddSteps {
    pub steps: i64,
}

#[derive(Debug, Serialize)]
pub struct WaterOut {
    pub amount: i64,
    #[serde(with = "iso_date")]
    pub date: Date,
}

#[derive(Debug, Serialize)]
pub struct StepOut {
    pub steps: i64,
    #[serde(with = "iso_date")]
    pub date: Date,
}

fn positive(kind: CounterKind, delta: i64) -> Result<i64, AppError> {
    if delta > 0 {
        Ok(delta)
    } else {
        Err(AppError::BadRequest(format!(
            "{} increment must be positive",
            kind.name()
        )))
    }
}

async fn today(state: &AppState, user: UserContext, kind: CounterKind) -> Result<(i64, Date), AppError> {
    let date = state.calendar.today();
    let value = repo::read_or_create(&state.db, kind, user.id, date).await?;
    Ok((value, date))
}

async fn add(
    state: &AppState,
    user: UserContext,
    kind: CounterKind,
    delta: i64,
) -> Result<(i64, Date), AppError> {
    let delta = positive(kind, delta)?;
    let date = state.calendar.today();
    let value = repo::increment(&state.db, kind, user.id, date, delta).await?;
    info!(user_id = %user.id, counter = kind.name(), delta, total = value, "counter incremented");
    Ok((value, date))
}

#[instrument(skip(state))]
pub async fn water_today(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
) -> Result<Json<WaterOut>, AppError> {
    let (amount, date) = today(&state, user, CounterKind::Water).await?;
    Ok(Json(WaterOut { amount, date }))
}

#[instrument(skip(state))]
pub async fn add_water(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
    Json(body): Json<AddWater>,
) -> Result<Json<WaterOut>, AppError> {
    let (amount, date) = add(&state, user, CounterKind::Water, body.amount).await?;
    Ok(Json(WaterOut { amount, date }))
}

#[instrument(skip(state))]
pub async fn steps_today(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
) -> Result<Json<StepOut>, AppError> {
    let (steps, date) = today(&state, user, CounterKind::Steps).await?;
    Ok(Json(StepOut { steps, date }))
}

#[instrument(skip(state))]
pub async fn add_steps(
    State(state): State<AppState>,
    OnboardedUser(user): OnboardedUser,
    Json(body): Json<AddSteps>,
) -> Result<Json<StepOut>, AppError> {
    let (steps, date) = add(&state, user, CounterKind::Steps, body.steps).await?;
    Ok(Json(StepOut { steps, date }))
}
