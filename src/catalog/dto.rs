use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::models::{FoodItem, Workout};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FoodQuery {
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
    pub min_calories: Option<Decimal>,
    pub max_calories: Option<Decimal>,
    pub min_protein: Option<Decimal>,
    pub max_protein: Option<Decimal>,
    pub min_carbs: Option<Decimal>,
    pub max_carbs: Option<Decimal>,
    pub min_fats: Option<Decimal>,
    pub max_fats: Option<Decimal>,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    10
}

impl FoodQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page < 1 {
            return Err(AppError::BadRequest("page must be >= 1".into()));
        }
        if !(1..=100).contains(&self.per_page) {
            return Err(AppError::BadRequest("per_page must be between 1 and 100".into()));
        }
        if (self.page - 1).checked_mul(self.per_page).is_none() {
            return Err(AppError::BadRequest("page is too large".into()));
        }
        Ok(())
    }

    /// Whitelisted sort column; unknown fields fall back to `name`.
    pub fn sort_column(&self) -> &'static str {
        match self.sort_by.as_deref() {
            Some("calories") => "calories",
            Some("protein") => "protein",
            Some("carbs") => "carbs",
            Some("fats") => "fats",
            _ => "name",
        }
    }

    /// Row offset of `page`; only meaningful after `validate` succeeded.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

#[derive(Debug, Serialize)]
pub struct FoodResponse {
    pub id: i32,
    pub name: String,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fats: Decimal,
    pub reference_amount: Decimal,
    pub reference_unit: String,
    /// Every unit a log for this food may use.
    pub units: Vec<String>,
}

impl From<FoodItem> for FoodResponse {
    fn from(f: FoodItem) -> Self {
        let mut units = vec![f.reference_unit.clone()];
        if let Some(conversions) = &f.unit_conversions {
            units.extend(conversions.keys().cloned());
        }
        Self {
            id: f.id,
            name: f.name,
            calories: f.calories,
            protein: f.protein,
            carbs: f.carbs,
            fats: f.fats,
            reference_amount: f.reference_amount,
            reference_unit: f.reference_unit,
            units,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedFoods {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub items: Vec<FoodResponse>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkoutQuery {
    pub search: Option<String>,
    pub muscle: Option<String>,
    pub difficulty: Option<String>,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default = "default_per_page")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl WorkoutQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=100).contains(&self.limit) {
            return Err(AppError::BadRequest("limit must be between 1 and 100".into()));
        }
        if self.offset < 0 {
            return Err(AppError::BadRequest("offset must be >= 0".into()));
        }
        Ok(())
    }

    pub fn sort_column(&self) -> &'static str {
        match self.sort_by.as_deref() {
            Some("calories_per_unit") => "calories_per_unit",
            Some("difficulty") => "difficulty",
            _ => "name",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WorkoutList {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<Workout>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::test_support::food;

    #[test]
    fn sort_columns_are_whitelisted() {
        let q = FoodQuery {
            sort_by: Some("calories; DROP TABLE users".into()),
            ..FoodQuery::default()
        };
        assert_eq!(q.sort_column(), "name");

        let q = WorkoutQuery {
            sort_by: Some("difficulty".into()),
            ..WorkoutQuery::default()
        };
        assert_eq!(q.sort_column(), "difficulty");
    }

    #[test]
    fn pagination_bounds() {
        let ok = FoodQuery {
            page: 3,
            per_page: 20,
            ..FoodQuery::default()
        };
        assert!(ok.validate().is_ok());
        assert_eq!(ok.offset(), 40);

        let zero_page = FoodQuery {
            page: 0,
            per_page: 10,
            ..FoodQuery::default()
        };
        assert!(zero_page.validate().is_err());

        let far_page = FoodQuery {
            page: i64::MAX,
            per_page: 100,
            ..FoodQuery::default()
        };
        assert!(matches!(far_page.validate(), Err(AppError::BadRequest(_))));
        assert_eq!(far_page.offset(), i64::MAX);

        let big = WorkoutQuery {
            limit: 500,
            ..WorkoutQuery::default()
        };
        assert!(big.validate().is_err());
    }

    #[test]
    fn food_response_lists_usable_units() {
        let mut milk = food("Milk", 60, 100, "ml");
        milk.unit_conversions = Some([("cup".to_string(), Decimal::from(240))].into());
        let resp = FoodResponse::from(milk);
        assert_eq!(resp.units, vec!["ml".to_string(), "cup".to_string()]);
    }
}
