use anyhow::Context;
use rust_decimal::Decimal;
use sqlx::{types::Json, FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::catalog::models::{FoodItem, FoodItemRow};

#[derive(Debug, Clone, FromRow)]
pub struct PlanRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
struct PlanItemRow {
    meal_name: String,
    day_label: Option<String>,
    quantity: Decimal,
    #[sqlx(rename = "item_unit")]
    unit: String,
    #[sqlx(flatten)]
    food: FoodItemRow,
}

/// A stored plan item with its food decoded, in insertion order.
#[derive(Debug, Clone)]
pub struct PlanItemEntry {
    pub meal_name: String,
    pub day_label: Option<String>,
    pub quantity: Decimal,
    pub unit: String,
    pub food: FoodItem,
}

/// A validated item ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlanItem {
    pub meal_name: String,
    pub day_label: Option<String>,
    pub food_id: i32,
    pub quantity: Decimal,
    pub unit: String,
}

/// Raw planner output kept next to a generated plan.
pub struct AiPlanRecord<'a> {
    pub plan_type: &'a str,
    pub prompt: &'a str,
    pub response: serde_json::Value,
}

pub async fn list(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<PlanRow>> {
    let rows = sqlx::query_as::<_, PlanRow>(
        r#"
        SELECT id, name, description, created_at
          FROM plans
         WHERE user_id = $1
         ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list plans")?;
    Ok(rows)
}

/// The plan if it exists and belongs to `user_id`.
pub async fn get(db: &PgPool, user_id: Uuid, plan_id: Uuid) -> anyhow::Result<Option<PlanRow>> {
    let row = sqlx::query_as::<_, PlanRow>(
        r#"
        SELECT id, name, description, created_at
          FROM plans
         WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(plan_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("get plan")?;
    Ok(row)
}

pub async fn items(db: &PgPool, plan_id: Uuid) -> anyhow::Result<Vec<PlanItemEntry>> {
    let rows = sqlx::query_as::<_, PlanItemRow>(
        r#"
        SELECT pi.meal_name, pi.day_label, pi.quantity, pi.unit AS item_unit,
               fi.id, fi.name, fi.calories, fi.protein, fi.carbs, fi.fats, fi.vitamins,
               fi.reference_amount, fi.reference_unit, fi.unit_conversions
          FROM plan_items pi
          JOIN food_items fi ON fi.id = pi.food_id
         WHERE pi.plan_id = $1
         ORDER BY pi.id ASC
        "#,
    )
    .bind(plan_id)
    .fetch_all(db)
    .await
    .context("list plan items")?;
    Ok(rows
        .into_iter()
        .map(|r| PlanItemEntry {
            meal_name: r.meal_name,
            day_label: r.day_label,
            quantity: r.quantity,
            unit: r.unit,
            food: r.food.into(),
        })
        .collect())
}

async fn insert_plan(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    name: &str,
    description: Option<&str>,
    items: &[NewPlanItem],
) -> anyhow::Result<Uuid> {
    let plan_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO plans (user_id, name, description)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(description)
    .fetch_one(&mut **tx)
    .await
    .context("insert plan")?;

    for item in items {
        sqlx::query(
            r#"
            INSERT INTO plan_items (plan_id, food_id, quantity, unit, meal_name, day_label)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(plan_id)
        .bind(item.food_id)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(&item.meal_name)
        .bind(&item.day_label)
        .execute(&mut **tx)
        .await
        .context("insert plan item")?;
    }
    Ok(plan_id)
}

/// Create a plan and all of its items atomically.
pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    name: &str,
    description: Option<&str>,
    items: &[NewPlanItem],
) -> anyhow::Result<Uuid> {
    let mut tx = db.begin().await.context("begin plan tx")?;
    let plan_id = insert_plan(&mut tx, user_id, name, description, items).await?;
    tx.commit().await.context("commit plan tx")?;
    Ok(plan_id)
}

/// Like [`create`], also recording the planner output in `ai_plans`.
pub async fn create_generated(
    db: &PgPool,
    user_id: Uuid,
    name: &str,
    description: Option<&str>,
    items: &[NewPlanItem],
    raw: AiPlanRecord<'_>,
) -> anyhow::Result<Uuid> {
    let mut tx = db.begin().await.context("begin plan tx")?;
    let plan_id = insert_plan(&mut tx, user_id, name, description, items).await?;
    sqlx::query(
        r#"
        INSERT INTO ai_plans (user_id, plan_id, plan_type, prompt, response)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(user_id)
    .bind(plan_id)
    .bind(raw.plan_type)
    .bind(raw.prompt)
    .bind(Json(raw.response))
    .execute(&mut *tx)
    .await
    .context("insert ai plan")?;
    tx.commit().await.context("commit plan tx")?;
    Ok(plan_id)
}

/// Delete a plan owned by `user_id`; items go with it. Returns whether a row was removed.
pub async fn delete(db: &PgPool, user_id: Uuid, plan_id: Uuid) -> anyhow::Result<bool> {
    let done = sqlx::query("DELETE FROM plans WHERE id = $1 AND user_id = $2")
        .bind(plan_id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete plan")?;
    Ok(done.rows_affected() > 0)
}
