use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::Estimate;

/// A workout log joined with the name and tags of its workout.
#[derive(Debug, Clone, FromRow)]
pub struct WorkoutLogRow {
    pub id: Uuid,
    pub workout_id: i32,
    pub workout_name: String,
    pub unit: String,
    pub muscle_groups: Vec<String>,
    pub sets: Option<i32>,
    pub reps_per_set: Option<i32>,
    pub duration_minutes: Option<i32>,
    pub total_units: Option<i32>,
    pub estimated_calories: Decimal,
    pub logged_at: OffsetDateTime,
}

const JOINED_SELECT: &str = r#"
    SELECT wl.id, wl.workout_id, w.name AS workout_name, w.unit, w.muscle_groups,
           wl.sets, wl.reps_per_set, wl.duration_minutes, wl.total_units,
           wl.estimated_calories, wl.logged_at
      FROM workout_logs wl
      JOIN workouts w ON w.id = wl.workout_id
"#;

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    workout_id: i32,
    est: &Estimate,
    logged_at: OffsetDateTime,
) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO workout_logs
            (user_id, workout_id, sets, reps_per_set, duration_minutes,
             total_units, estimated_calories, logged_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(workout_id)
    .bind(est.sets)
    .bind(est.reps_per_set)
    .bind(est.duration_minutes)
    .bind(est.total_units)
    .bind(est.estimated_calories)
    .bind(logged_at)
    .fetch_one(db)
    .await?;
    Ok(id)
}

pub async fn list_all(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<WorkoutLogRow>> {
    let rows = sqlx::query_as::<_, WorkoutLogRow>(&format!(
        "{} WHERE wl.user_id = $1 ORDER BY wl.logged_at DESC",
        JOINED_SELECT
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Logs with `from <= logged_at < to`, oldest first.
pub async fn list_between(
    db: &PgPool,
    user_id: Uuid,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> anyhow::Result<Vec<WorkoutLogRow>> {
    let rows = sqlx::query_as::<_, WorkoutLogRow>(&format!(
        "{} WHERE wl.user_id = $1 AND wl.logged_at >= $2 AND wl.logged_at < $3 \
         ORDER BY wl.logged_at ASC",
        JOINED_SELECT
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
