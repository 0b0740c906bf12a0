use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::catalog::models::{FoodItem, FoodItemRow};

/// A food log joined with the catalog item it references.
#[derive(Debug, FromRow)]
pub struct FoodLogRow {
    #[sqlx(rename = "log_id")]
    pub id: Uuid,
    pub quantity: Decimal,
    #[sqlx(rename = "log_unit")]
    pub unit: String,
    pub logged_at: OffsetDateTime,
    #[sqlx(flatten)]
    pub food: FoodItemRow,
}

/// Log entry with its food already decoded.
#[derive(Debug, Clone)]
pub struct FoodLogEntry {
    pub id: Uuid,
    pub quantity: Decimal,
    pub unit: String,
    pub logged_at: OffsetDateTime,
    pub food: FoodItem,
}

impl From<FoodLogRow> for FoodLogEntry {
    fn from(r: FoodLogRow) -> Self {
        Self {
            id: r.id,
            quantity: r.quantity,
            unit: r.unit,
            logged_at: r.logged_at,
            food: r.food.into(),
        }
    }
}

const JOINED_SELECT: &str = r#"
    SELECT fl.id AS log_id, fl.quantity, fl.unit AS log_unit, fl.logged_at,
           fi.id, fi.name, fi.calories, fi.protein, fi.carbs, fi.fats, fi.vitamins,
           fi.reference_amount, fi.reference_unit, fi.unit_conversions
      FROM food_logs fl
      JOIN food_items fi ON fi.id = fl.food_id
"#;

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    food_id: i32,
    quantity: Decimal,
    unit: &str,
    logged_at: OffsetDateTime,
) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO food_logs (user_id, food_id, quantity, unit, logged_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(food_id)
    .bind(quantity)
    .bind(unit)
    .bind(logged_at)
    .fetch_one(db)
    .await?;
    Ok(id)
}

/// All of a user's logs, newest first.
pub async fn list_all(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<FoodLogEntry>> {
    let rows = sqlx::query_as::<_, FoodLogRow>(&format!(
        "{} WHERE fl.user_id = $1 ORDER BY fl.logged_at DESC",
        JOINED_SELECT
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(FoodLogEntry::from).collect())
}

/// Logs with `from <= logged_at < to`, oldest first.
pub async fn list_between(
    db: &PgPool,
    user_id: Uuid,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> anyhow::Result<Vec<FoodLogEntry>> {
    let rows = sqlx::query_as::<_, FoodLogRow>(&format!(
        "{} WHERE fl.user_id = $1 AND fl.logged_at >= $2 AND fl.logged_at < $3 \
         ORDER BY fl.logged_at ASC",
        JOINED_SELECT
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(FoodLogEntry::from).collect())
}
