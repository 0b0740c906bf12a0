use rust_decimal::Decimal;
use time::{Date, UtcOffset};
use tracing::{info, warn};

use super::dto::{CreateFoodLogRequest, DailyNutrients, FoodLogResponse, FoodSummary};
use super::repo::{self, FoodLogEntry};
use crate::{
    catalog,
    error::AppError,
    nutrition::{
        bucketize, max_quantity, project, round_quantity, scale_factor, sum_nutrients,
        DateWindow, NutrientRecord, NutritionError,
    },
    state::AppState,
    users::model::UserContext,
};

/// Nutrients of a stored log, recomputed from its food's reference basis.
///
/// The unit was validated when the log was written, so a failure here means
/// the catalog item changed underneath it.
pub fn nutrients_of(entry: &FoodLogEntry) -> Result<NutrientRecord, NutritionError> {
    let factor = scale_factor(&entry.food, entry.quantity, &entry.unit).map_err(|e| match e {
        NutritionError::InvalidUnit { unit } => NutritionError::DataIntegrity(format!(
            "food {} no longer accepts unit '{}'",
            entry.food.id, unit
        )),
        other => other,
    })?;
    project(&entry.food, factor)
}

pub fn to_response(entry: FoodLogEntry) -> Result<FoodLogResponse, NutritionError> {
    let nutrients = nutrients_of(&entry)?;
    Ok(FoodLogResponse {
        id: entry.id,
        food_id: entry.food.id,
        food_name: entry.food.name,
        quantity: entry.quantity,
        unit: entry.unit,
        logged_at: entry.logged_at,
        nutrients,
    })
}

/// Per-day and overall nutrient totals for `entries` over `window`.
pub fn summarize(
    entries: &[FoodLogEntry],
    window: DateWindow,
    tz: UtcOffset,
) -> Result<FoodSummary, NutritionError> {
    let projected = entries
        .iter()
        .map(|e| Ok((e.logged_at, nutrients_of(e)?)))
        .collect::<Result<Vec<_>, NutritionError>>()?;

    let daily = bucketize(&projected, window.start, window.days, tz, |p| p.0)
        .into_iter()
        .map(|bucket| {
            Ok(DailyNutrients {
                date: bucket.date,
                entries: bucket.records.len(),
                totals: sum_nutrients(bucket.records.iter().map(|p| &p.1))?,
            })
        })
        .collect::<Result<Vec<_>, NutritionError>>()?;
    let totals = sum_nutrients(daily.iter().map(|d| &d.totals))?;

    Ok(FoodSummary {
        range: window,
        daily,
        totals,
    })
}

/// A client quantity rounded to stored precision, rejected unless it lies in
/// `(0, max_quantity()]` after rounding.
pub fn checked_quantity(quantity: Decimal) -> Result<Decimal, AppError> {
    let rounded = round_quantity(quantity);
    if rounded <= Decimal::ZERO {
        return Err(AppError::BadRequest("quantity must be positive".into()));
    }
    if rounded > max_quantity() {
        return Err(AppError::BadRequest(format!(
            "quantity must not exceed {}",
            max_quantity()
        )));
    }
    Ok(rounded)
}

pub async fn create_food_log(
    state: &AppState,
    user: UserContext,
    req: CreateFoodLogRequest,
) -> Result<FoodLogResponse, AppError> {
    let quantity = checked_quantity(req.quantity)?;
    let food = catalog::repo::get_food(&state.db, req.food_id)
        .await?
        .ok_or(AppError::NotFound("Food item"))?;

    // Validate before writing so bad units never reach the table.
    let factor = scale_factor(&food, quantity, &req.unit)?;
    let nutrients = project(&food, factor)?;

    let logged_at = state.calendar.now();
    let id = repo::insert(&state.db, user.id, food.id, quantity, &req.unit, logged_at).await?;
    info!(log_id = %id, user_id = %user.id, food_id = food.id, calories = %nutrients.calories, "food logged");

    Ok(FoodLogResponse {
        id,
        food_id: food.id,
        food_name: food.name,
        quantity,
        unit: req.unit,
        logged_at,
        nutrients,
    })
}

pub async fn list_food_logs(
    state: &AppState,
    user: UserContext,
    date: Option<Date>,
) -> Result<Vec<FoodLogResponse>, AppError> {
    let entries = match date {
        Some(day) => {
            let (from, to) = DateWindow::ending_on(day, 1).bounds(state.calendar.tz());
            let mut entries = repo::list_between(&state.db, user.id, from, to).await?;
            entries.reverse();
            entries
        }
        None => repo::list_all(&state.db, user.id).await?,
    };
    let responses = entries
        .into_iter()
        .map(to_response)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            warn!(error = %e, user_id = %user.id, "stored food log no longer projects");
            e
        })?;
    Ok(responses)
}

pub async fn food_summary(
    state: &AppState,
    user: UserContext,
    days: i64,
) -> Result<FoodSummary, AppError> {
    let window = state.calendar.window(days);
    let (from, to) = window.bounds(state.calendar.tz());
    let entries = repo::list_between(&state.db, user.id, from, to).await?;
    Ok(summarize(&entries, window, state.calendar.tz())?)
}
