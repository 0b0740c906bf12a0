//! AI meal-plan drafting.
//!
//! A [`MealPlanner`] turns a profile plus the food catalog into a
//! [`GeneratedPlan`]. Drafts are untrusted: callers validate every item
//! against the catalog before anything is stored.

pub mod gemini;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::models::FoodItem;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("AI planner not configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    Request(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("unexpected response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannerProfile {
    pub dietary_prefs: Vec<String>,
    pub goals: Option<String>,
    pub bmi: Option<f64>,
}

/// Catalog line shown to the planner.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogLine {
    pub id: i32,
    pub name: String,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fats: Decimal,
    pub reference_amount: Decimal,
    pub reference_unit: String,
    pub other_units: Vec<String>,
}

impl From<&FoodItem> for CatalogLine {
    fn from(f: &FoodItem) -> Self {
        Self {
            id: f.id,
            name: f.name.clone(),
            calories: f.calories,
            protein: f.protein,
            carbs: f.carbs,
            fats: f.fats,
            reference_amount: f.reference_amount,
            reference_unit: f.reference_unit.clone(),
            other_units: f
                .unit_conversions
                .as_ref()
                .map(|m| m.keys().cloned().collect())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub profile: PlannerProfile,
    pub foods: Vec<CatalogLine>,
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedItem {
    pub food_id: i32,
    pub quantity: Decimal,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedMeal {
    pub meal: String,
    pub items: Vec<GeneratedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDay {
    pub day: u32,
    pub meals: Vec<GeneratedMeal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub days: Vec<GeneratedDay>,
}

/// A plan as drafted, with the prompt that produced it.
#[derive(Debug, Clone)]
pub struct PlanDraft {
    pub prompt: String,
    pub plan: GeneratedPlan,
}

#[async_trait]
pub trait MealPlanner: Send + Sync {
    async fn draft(&self, req: &PlanRequest) -> Result<PlanDraft, PlannerError>;
}

/// Used when no API key is configured.
pub struct DisabledPlanner;

#[async_trait]
impl MealPlanner for DisabledPlanner {
    async fn draft(&self, _req: &PlanRequest) -> Result<PlanDraft, PlannerError> {
        Err(PlannerError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_planner_refuses() {
        let planner: Box<dyn MealPlanner> = Box::new(DisabledPlanner);
        let req = PlanRequest {
            profile: PlannerProfile {
                dietary_prefs: vec![],
                goals: None,
                bmi: None,
            },
            foods: vec![],
            days: 1,
        };
        assert!(matches!(planner.draft(&req).await, Err(PlannerError::NotConfigured)));
    }

    #[test]
    fn catalog_line_lists_alternate_units() {
        let mut chapati = crate::catalog::models::test_support::food("Chapati", 70, 40, "g");
        chapati.unit_conversions = Some(std::collections::BTreeMap::from([(
            "piece".to_string(),
            Decimal::from(40),
        )]));
        let line = CatalogLine::from(&chapati);
        assert_eq!(line.other_units, vec!["piece".to_string()]);
        assert_eq!(line.reference_unit, "g");
    }
}
