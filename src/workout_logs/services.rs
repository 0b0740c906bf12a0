use time::{Date, UtcOffset};
use tracing::info;

use super::dto::{DailyBurn, LogWorkoutRequest, WorkoutLogResponse, WorkoutSummary, WorkoutTotals};
use super::repo::{self, WorkoutLogRow};
use crate::{
    catalog,
    error::AppError,
    nutrition::{bucketize, estimate, sum_calories, DateWindow},
    state::AppState,
    users::model::UserContext,
};

/// Burned calories per local day over `window`, read from the values
/// frozen on each log.
pub fn summarize(rows: &[WorkoutLogRow], window: DateWindow, tz: UtcOffset) -> WorkoutSummary {
    let daily: Vec<DailyBurn> = bucketize(rows, window.start, window.days, tz, |r| r.logged_at)
        .into_iter()
        .map(|bucket| DailyBurn {
            date: bucket.date,
            sessions: bucket.records.len(),
            calories_burned: sum_calories(bucket.records.iter().map(|r| r.estimated_calories)),
        })
        .collect();
    let totals = WorkoutTotals {
        sessions: daily.iter().map(|d| d.sessions).sum(),
        calories_burned: sum_calories(daily.iter().map(|d| d.calories_burned)),
    };
    WorkoutSummary {
        range: window,
        daily,
        totals,
    }
}

pub async fn log_workout(
    state: &AppState,
    user: UserContext,
    req: LogWorkoutRequest,
) -> Result<WorkoutLogResponse, AppError> {
    let workout = catalog::repo::get_workout(&state.db, req.workout_id)
        .await?
        .ok_or(AppError::NotFound("Workout"))?;

    let est = estimate(&workout, &req.effort)?;
    let logged_at = state.calendar.now();
    let id = repo::insert(&state.db, user.id, workout.id, &est, logged_at).await?;
    info!(
        log_id = %id,
        user_id = %user.id,
        workout_id = workout.id,
        mode = %est.mode,
        calories = %est.estimated_calories,
        "workout logged"
    );

    Ok(WorkoutLogResponse {
        id,
        workout_id: workout.id,
        workout_name: workout.name,
        unit: workout.unit,
        muscle_groups: workout.muscle_groups,
        sets: est.sets,
        reps_per_set: est.reps_per_set,
        duration_minutes: est.duration_minutes,
        total_units: est.total_units,
        estimated_calories: est.estimated_calories,
        logged_at,
    })
}

pub async fn list_workout_logs(
    state: &AppState,
    user: UserContext,
    date: Option<Date>,
) -> Result<Vec<WorkoutLogResponse>, AppError> {
    let rows = match date {
        Some(day) => {
            let (from, to) = DateWindow::ending_on(day, 1).bounds(state.calendar.tz());
            let mut rows = repo::list_between(&state.db, user.id, from, to).await?;
            rows.reverse();
            rows
        }
        None => repo::list_all(&state.db, user.id).await?,
    };
    Ok(rows.into_iter().map(WorkoutLogResponse::from).collect())
}

pub async fn workout_summary(
    state: &AppState,
    user: UserContext,
    days: i64,
) -> Result<WorkoutSummary, AppError> {
    let window = state.calendar.window(days);
    let (from, to) = window.bounds(state.calendar.tz());
    let rows = repo::list_between(&state.db, user.id, from, to).await?;
    Ok(summarize(&rows, window, state.calendar.tz()))
}
