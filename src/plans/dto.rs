use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::PlanRow;
use crate::nutrition::NutrientRecord;

#[derive(Debug, Clone, Deserialize)]
pub struct PlanItemInput {
    pub meal_name: String,
    #[serde(default)]
    pub day_label: Option<String>,
    pub food_id: i32,
    pub quantity: Decimal,
    pub unit: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub items: Vec<PlanItemInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneratePlanRequest {
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PlanSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<PlanRow> for PlanSummary {
    fn from(p: PlanRow) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanItemView {
    pub food_id: i32,
    pub food_name: String,
    pub quantity: Decimal,
    pub unit: String,
    #[serde(flatten)]
    pub nutrients: NutrientRecord,
}

#[derive(Debug, Serialize)]
pub struct MealGroup {
    pub day_label: Option<String>,
    pub meal: String,
    pub items: Vec<PlanItemView>,
    pub totals: NutrientRecord,
}

#[derive(Debug, Serialize)]
pub struct PlanDetail {
    pub plan_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub meals: Vec<MealGroup>,
    pub totals: NutrientRecord,
}
