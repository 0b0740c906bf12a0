use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, UtcOffset};

use crate::{
    clock::iso_date,
    error::AppError,
    food_logs::{self, repo::FoodLogEntry},
    nutrition::{bucketize, sum_calories, sum_nutrients, CalorieBalance, DateWindow, NutritionError},
    state::AppState,
    users::model::UserContext,
    workout_logs::{self, repo::WorkoutLogRow},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Macros {
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fats: Decimal,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub days: i64,
    pub range: DateWindow,
    pub calories: CalorieBalance,
    pub macros: Macros,
}

#[derive(Debug, Serialize)]
pub struct TrendPoint {
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(flatten)]
    pub balance: CalorieBalance,
}

#[derive(Debug, Serialize)]
pub struct Trends {
    pub days: i64,
    pub range: DateWindow,
    pub trends: Vec<TrendPoint>,
}

/// Daily consumed/burned balance over `window`.
///
/// Consumption goes through the same projection as the food summary and
/// burn reads the calories frozen on each workout log, so the sums here
/// always match the per-module summaries for the same window.
pub fn daily_balance(
    foods: &[FoodLogEntry],
    workouts: &[WorkoutLogRow],
    window: DateWindow,
    tz: UtcOffset,
) -> Result<Vec<TrendPoint>, NutritionError> {
    let food_summary = food_logs::services::summarize(foods, window, tz)?;
    let burned = bucketize(workouts, window.start, window.days, tz, |w| w.logged_at);

    Ok(food_summary
        .daily
        .iter()
        .zip(burned)
        .map(|(eaten, burnt)| TrendPoint {
            date: eaten.date,
            balance: CalorieBalance::new(
                eaten.totals.calories,
                sum_calories(burnt.records.iter().map(|w| w.estimated_calories)),
            ),
        })
        .collect())
}

pub fn summarize(
    foods: &[FoodLogEntry],
    workouts: &[WorkoutLogRow],
    window: DateWindow,
) -> Result<DashboardSummary, NutritionError> {
    let projected = foods
        .iter()
        .map(food_logs::services::nutrients_of)
        .collect::<Result<Vec<_>, _>>()?;
    let eaten = sum_nutrients(&projected)?;
    let burned = sum_calories(workouts.iter().map(|w| w.estimated_calories));

    Ok(DashboardSummary {
        days: window.days,
        range: window,
        calories: CalorieBalance::new(eaten.calories, burned),
        macros: Macros {
            protein: eaten.protein,
            carbs: eaten.carbs,
            fats: eaten.fats,
        },
    })
}

async fn load_window(
    state: &AppState,
    user: UserContext,
    window: DateWindow,
) -> Result<(Vec<FoodLogEntry>, Vec<WorkoutLogRow>), AppError> {
    let (from, to) = window.bounds(state.calendar.tz());
    let foods = food_logs::repo::list_between(&state.db, user.id, from, to).await?;
    let workouts = workout_logs::repo::list_between(&state.db, user.id, from, to).await?;
    Ok((foods, workouts))
}

pub async fn dashboard_summary(
    state: &AppState,
    user: UserContext,
    days: i64,
) -> Result<DashboardSummary, AppError> {
    let window = state.calendar.window(days);
    let (foods, workouts) = load_window(state, user, window).await?;
    Ok(summarize(&foods, &workouts, window)?)
}

pub async fn dashboard_trends(
    state: &AppState,
    user: UserContext,
    days: i64,
) -> Result<Trends, AppError> {
    let window = state.calendar.window(days);
    let (foods, workouts) = load_window(state, user, window).await?;
    let trends = daily_balance(&foods, &workouts, window, state.calendar.tz())?;
    Ok(Trends {
        days: window.days,
        range: window,
        trends,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::test_support::food;
    use time::macros::{date, datetime, offset};
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn meal(grams: i64, at: OffsetDateTime) -> FoodLogEntry {
        let mut rice = food("Rice (cooked)", 130, 100, "g");
        rice.protein = Decimal::new(27, 1);
        FoodLogEntry {
            id: Uuid::new_v4(),
            quantity: Decimal::from(grams),
            unit: "g".into(),
            logged_at: at,
            food: rice,
        }
    }

    fn session(calories: i64, at: OffsetDateTime) -> WorkoutLogRow {
        WorkoutLogRow {
            id: Uuid::new_v4(),
            workout_id: 3,
            workout_name: "Jumping Jacks".into(),
            unit: "minutes".into(),
            muscle_groups: vec![],
            sets: None,
            reps_per_set: None,
            duration_minutes: Some(10),
            total_units: None,
            estimated_calories: Decimal::from(calories),
            logged_at: at,
        }
    }

    #[test]
    fn net_goes_negative_without_clamping() {
        let window = DateWindow::ending_on(date!(2025 - 03 - 07), 1);
        let foods = vec![meal(100, datetime!(2025-03-07 09:00 +05:30))];
        let workouts = vec![session(200, datetime!(2025-03-07 18:00 +05:30))];
        let s = summarize(&foods, &workouts, window).unwrap();
        assert_eq!(s.calories.consumed, Decimal::from(130));
        assert_eq!(s.calories.burned, Decimal::from(200));
        assert_eq!(s.calories.net, Decimal::from(-70));
        assert_eq!(s.macros.protein, Decimal::new(27, 1));
    }

    #[test]
    fn trends_agree_with_summary_totals() {
        let tz = offset!(+05:30);
        let window = DateWindow::ending_on(date!(2025 - 03 - 07), 3);
        let foods = vec![
            meal(250, datetime!(2025-03-05 13:00 +05:30)),
            meal(100, datetime!(2025-03-07 20:00 +05:30)),
        ];
        let workouts = vec![session(80, datetime!(2025-03-06 06:00 +05:30))];

        let trend = daily_balance(&foods, &workouts, window, tz).unwrap();
        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0].balance.consumed, Decimal::from(325));
        assert_eq!(trend[1].balance.net, Decimal::from(-80));
        assert_eq!(trend[2].balance, CalorieBalance::new(Decimal::from(130), Decimal::ZERO));

        let summary = summarize(&foods, &workouts, window).unwrap();
        let consumed: Decimal = trend.iter().map(|t| t.balance.consumed).sum();
        let burned: Decimal = trend.iter().map(|t| t.balance.burned).sum();
        assert_eq!(summary.calories, CalorieBalance::new(consumed, burned));
    }

    #[test]
    fn trend_rows_are_flat() {
        let point = TrendPoint {
            date: date!(2025 - 03 - 07),
            balance: CalorieBalance::new(Decimal::from(10), Decimal::from(4)),
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["date"], "2025-03-07");
        assert_eq!(json["net"], serde_json::json!(6.0));
    }
}
