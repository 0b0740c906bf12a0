use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::clock::iso_date;
use crate::nutrition::{DateWindow, NutrientRecord};

#[derive(Debug, Deserialize)]
pub struct CreateFoodLogRequest {
    pub food_id: i32,
    pub quantity: Decimal,
    pub unit: String,
}

#[derive(Debug, Serialize)]
pub struct FoodLogResponse {
    pub id: Uuid,
    pub food_id: i32,
    pub food_name: String,
    pub quantity: Decimal,
    pub unit: String,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
    #[serde(flatten)]
    pub nutrients: NutrientRecord,
}

#[derive(Debug, Serialize)]
pub struct DailyNutrients {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub entries: usize,
    #[serde(flatten)]
    pub totals: NutrientRecord,
}

#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub range: DateWindow,
    pub daily: Vec<DailyNutrients>,
    pub totals: NutrientRecord,
}
