use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo::WorkoutLogRow;
use crate::clock::iso_date;
use crate::nutrition::{DateWindow, Effort};

#[derive(Debug, Deserialize)]
pub struct LogWorkoutRequest {
    pub workout_id: i32,
    #[serde(flatten)]
    pub effort: Effort,
}

#[derive(Debug, Serialize)]
pub struct WorkoutLogResponse {
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
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
}

impl From<WorkoutLogRow> for WorkoutLogResponse {
    fn from(r: WorkoutLogRow) -> Self {
        Self {
            id: r.id,
            workout_id: r.workout_id,
            workout_name: r.workout_name,
            unit: r.unit,
            muscle_groups: r.muscle_groups,
            sets: r.sets,
            reps_per_set: r.reps_per_set,
            duration_minutes: r.duration_minutes,
            total_units: r.total_units,
            estimated_calories: r.estimated_calories,
            logged_at: r.logged_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DailyBurn {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub sessions: usize,
    pub calories_burned: Decimal,
}

#[derive(Debug, Serialize)]
pub struct WorkoutTotals {
    pub sessions: usize,
    pub calories_burned: Decimal,
}

#[derive(Debug, Serialize)]
pub struct WorkoutSummary {
    pub range: DateWindow,
    pub daily: Vec<DailyBurn>,
    pub totals: WorkoutTotals,
}
