use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub bmi: Option<f64>,
    pub dietary_prefs: Option<Vec<String>>,
    pub goals: Option<String>,
    pub target_weight: Option<f64>,
    pub is_onboarded: bool,
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn context(&self) -> UserContext {
        UserContext {
            id: self.id,
            is_onboarded: self.is_onboarded,
        }
    }
}

/// The authenticated caller, passed explicitly into every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserContext {
    pub id: Uuid,
    pub is_onboarded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DietaryPreference {
    #[serde(rename = "veg")]
    Veg,
    #[serde(rename = "non-veg")]
    NonVeg,
    #[serde(rename = "vegan")]
    Vegan,
}

impl DietaryPreference {
    pub fn as_str(self) -> &'static str {
        match self {
            DietaryPreference::Veg => "veg",
            DietaryPreference::NonVeg => "non-veg",
            DietaryPreference::Vegan => "vegan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    #[serde(rename = "weight loss")]
    WeightLoss,
    #[serde(rename = "weight gain")]
    WeightGain,
    #[serde(rename = "maintain healthy")]
    MaintainHealthy,
}

impl Goal {
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::WeightLoss => "weight loss",
            Goal::WeightGain => "weight gain",
            Goal::MaintainHealthy => "maintain healthy",
        }
    }
}

/// Body-mass index rounded to two decimals, or `None` without a usable height.
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    let height_m = height_cm / 100.0;
    if height_m <= 0.0 || weight_kg <= 0.0 {
        return None;
    }
    let bmi = weight_kg / (height_m * height_m);
    Some((bmi * 100.0).round() / 100.0)
}
