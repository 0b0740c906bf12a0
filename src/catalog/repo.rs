use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::dto::{FoodQuery, WorkoutQuery};
use super::models::{FoodItem, FoodItemRow, Workout};

const FOOD_COLUMNS: &str = "id, name, calories, protein, carbs, fats, vitamins, \
     reference_amount, reference_unit, unit_conversions";

const WORKOUT_COLUMNS: &str = "id, name, unit, calories_per_unit, muscle_groups, difficulty";

pub async fn get_food(db: &PgPool, id: i32) -> anyhow::Result<Option<FoodItem>> {
    let row = sqlx::query_as::<_, FoodItemRow>(&format!(
        "SELECT {} FROM food_items WHERE id = $1",
        FOOD_COLUMNS
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .context("get food item")?;
    Ok(row.map(FoodItem::from))
}

/// Every food in the catalog, by name.
pub async fn all_foods(db: &PgPool) -> anyhow::Result<Vec<FoodItem>> {
    let rows = sqlx::query_as::<_, FoodItemRow>(&format!(
        "SELECT {} FROM food_items ORDER BY name ASC",
        FOOD_COLUMNS
    ))
    .fetch_all(db)
    .await
    .context("list all food items")?;
    Ok(rows.into_iter().map(FoodItem::from).collect())
}

pub async fn foods_by_ids(db: &PgPool, ids: &[i32]) -> anyhow::Result<Vec<FoodItem>> {
    let rows = sqlx::query_as::<_, FoodItemRow>(&format!(
        "SELECT {} FROM food_items WHERE id = ANY($1)",
        FOOD_COLUMNS
    ))
    .bind(ids)
    .fetch_all(db)
    .await
    .context("fetch food items by id")?;
    Ok(rows.into_iter().map(FoodItem::from).collect())
}

fn push_food_filters(qb: &mut QueryBuilder<'_, Postgres>, q: &FoodQuery) {
    qb.push(" WHERE TRUE");
    if let Some(search) = q.search.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND name ILIKE ")
            .push_bind(format!("%{}%", search.trim()));
    }
    let ranges = [
        ("calories", q.min_calories, q.max_calories),
        ("protein", q.min_protein, q.max_protein),
        ("carbs", q.min_carbs, q.max_carbs),
        ("fats", q.min_fats, q.max_fats),
    ];
    for (column, min, max) in ranges {
        if let Some(min) = min {
            qb.push(format!(" AND {} >= ", column)).push_bind(min);
        }
        if let Some(max) = max {
            qb.push(format!(" AND {} <= ", column)).push_bind(max);
        }
    }
}

/// One page of foods matching `q`, plus the total match count.
pub async fn list_foods(db: &PgPool, q: &FoodQuery) -> anyhow::Result<(i64, Vec<FoodItem>)> {
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM food_items");
    push_food_filters(&mut count, q);
    let total: i64 = count
        .build_query_scalar()
        .fetch_one(db)
        .await
        .context("count food items")?;

    let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM food_items", FOOD_COLUMNS));
    push_food_filters(&mut select, q);
    select
        .push(format!(
            " ORDER BY {} {}, id ASC LIMIT ",
            q.sort_column(),
            q.order.as_sql()
        ))
        .push_bind(q.per_page)
        .push(" OFFSET ")
        .push_bind(q.offset());
    let rows = select
        .build_query_as::<FoodItemRow>()
        .fetch_all(db)
        .await
        .context("list food items")?;

    Ok((total, rows.into_iter().map(FoodItem::from).collect()))
}

pub async fn get_workout(db: &PgPool, id: i32) -> anyhow::Result<Option<Workout>> {
    let row = sqlx::query_as::<_, Workout>(&format!(
        "SELECT {} FROM workouts WHERE id = $1",
        WORKOUT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .context("get workout")?;
    Ok(row)
}

fn push_workout_filters(qb: &mut QueryBuilder<'_, Postgres>, q: &WorkoutQuery) {
    qb.push(" WHERE TRUE");
    if let Some(search) = q.search.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND name ILIKE ")
            .push_bind(format!("%{}%", search.trim()));
    }
    if let Some(muscle) = q.muscle.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND ")
            .push_bind(muscle.trim().to_string())
            .push(" = ANY(muscle_groups)");
    }
    if let Some(difficulty) = q.difficulty.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND difficulty ILIKE ")
            .push_bind(difficulty.trim().to_string());
    }
}

pub async fn list_workouts(db: &PgPool, q: &WorkoutQuery) -> anyhow::Result<(i64, Vec<Workout>)> {
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM workouts");
    push_workout_filters(&mut count, q);
    let total: i64 = count
        .build_query_scalar()
        .fetch_one(db)
        .await
        .context("count workouts")?;

    let mut select =
        QueryBuilder::<Postgres>::new(format!("SELECT {} FROM workouts", WORKOUT_COLUMNS));
    push_workout_filters(&mut select, q);
    select
        .push(format!(
            " ORDER BY {} {}, id ASC LIMIT ",
            q.sort_column(),
            q.order.as_sql()
        ))
        .push_bind(q.limit)
        .push(" OFFSET ")
        .push_bind(q.offset);
    let rows = select
        .build_query_as::<Workout>()
        .fetch_all(db)
        .await
        .context("list workouts")?;

    Ok((total, rows))
}
