use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{types::Json, FromRow};

use crate::nutrition::{EnergyRate, ReferenceBasis};

/// Food catalog row as stored; JSON columns may be NULL.
#[derive(Debug, FromRow)]
pub struct FoodItemRow {
    pub id: i32,
    pub name: String,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fats: Decimal,
    pub vitamins: Option<Json<BTreeMap<String, Decimal>>>,
    pub reference_amount: Decimal,
    pub reference_unit: String,
    pub unit_conversions: Option<Json<BTreeMap<String, Decimal>>>,
}

/// A food whose nutrients are given per `reference_amount` of `reference_unit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodItem {
    pub id: i32,
    pub name: String,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fats: Decimal,
    pub vitamins: BTreeMap<String, Decimal>,
    pub reference_amount: Decimal,
    pub reference_unit: String,
    /// Alternate unit -> equivalent quantity in the reference unit.
    pub unit_conversions: Option<BTreeMap<String, Decimal>>,
}

impl From<FoodItemRow> for FoodItem {
    fn from(r: FoodItemRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            calories: r.calories,
            protein: r.protein,
            carbs: r.carbs,
            fats: r.fats,
            vitamins: r.vitamins.map(|j| j.0).unwrap_or_default(),
            reference_amount: r.reference_amount,
            reference_unit: r.reference_unit,
            unit_conversions: r.unit_conversions.map(|j| j.0),
        }
    }
}

impl ReferenceBasis for FoodItem {
    fn reference_amount(&self) -> Decimal {
        self.reference_amount
    }

    fn reference_unit(&self) -> &str {
        &self.reference_unit
    }

    fn conversion_factor(&self, unit: &str) -> Option<Decimal> {
        self.unit_conversions.as_ref()?.get(unit).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Workout {
    pub id: i32,
    pub name: String,
    /// `reps` or `minutes`; anything else is bad catalog data.
    pub unit: String,
    pub calories_per_unit: Decimal,
    pub muscle_groups: Vec<String>,
    pub difficulty: String,
}

impl EnergyRate for Workout {
    fn unit_mode(&self) -> &str {
        &self.unit
    }

    fn calories_per_unit(&self) -> Decimal {
        self.calories_per_unit
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    pub fn food(name: &str, calories: i64, reference_amount: i64, reference_unit: &str) -> FoodItem {
        FoodItem {
            id: 1,
            name: name.into(),
            calories: Decimal::from(calories),
            protein: Decimal::ZERO,
            carbs: Decimal::ZERO,
            fats: Decimal::ZERO,
            vitamins: BTreeMap::new(),
            reference_amount: Decimal::from(reference_amount),
            reference_unit: reference_unit.into(),
            unit_conversions: None,
        }
    }

    pub fn workout(name: &str, unit: &str, calories_per_unit: Decimal) -> Workout {
        Workout {
            id: 1,
            name: name.into(),
            unit: unit.into(),
            calories_per_unit,
            muscle_groups: vec!["full body".into()],
            difficulty: "medium".into(),
        }
    }
}
