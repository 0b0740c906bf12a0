use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{compute_bmi, DietaryPreference, Goal, User};
use crate::error::AppError;

/// Public view of a user profile.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub bmi: Option<f64>,
    pub dietary_prefs: Vec<String>,
    pub goals: Option<String>,
    pub target_weight: Option<f64>,
    pub is_onboarded: bool,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            age: u.age,
            gender: u.gender,
            height_cm: u.height_cm,
            weight_kg: u.weight_kg,
            bmi: u.bmi,
            dietary_prefs: u.dietary_prefs.unwrap_or_default(),
            goals: u.goals,
            target_weight: u.target_weight,
            is_onboarded: u.is_onboarded,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub dietary_prefs: Option<Vec<DietaryPreference>>,
}

impl UpdateProfileRequest {
    /// Apply the present fields to `user`, recomputing BMI when both
    /// height and weight are known afterwards.
    pub fn apply(self, user: &mut User) -> Result<(), AppError> {
        if let Some(name) = self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::BadRequest("name must not be empty".into()));
            }
            user.name = name.to_string();
        }
        if let Some(age) = self.age {
            if age <= 0 {
                return Err(AppError::BadRequest("age must be positive".into()));
            }
            user.age = Some(age);
        }
        if let Some(h) = self.height_cm {
            if h <= 0.0 {
                return Err(AppError::BadRequest("height_cm must be positive".into()));
            }
            user.height_cm = Some(h);
        }
        if let Some(w) = self.weight_kg {
            if w <= 0.0 {
                return Err(AppError::BadRequest("weight_kg must be positive".into()));
            }
            user.weight_kg = Some(w);
        }
        if let Some(prefs) = self.dietary_prefs {
            user.dietary_prefs = Some(prefs.iter().map(|p| p.as_str().to_string()).collect());
        }
        if let (Some(h), Some(w)) = (user.height_cm, user.weight_kg) {
            user.bmi = compute_bmi(h, w);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct GoalsRequest {
    pub goals: Goal,
    pub target_weight: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct GoalsResponse {
    pub id: Uuid,
    pub goals: Option<String>,
    pub target_weight: Option<f64>,
    pub current_weight: Option<f64>,
    pub bmi: Option<f64>,
}

impl From<&User> for GoalsResponse {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            goals: u.goals.clone(),
            target_weight: u.target_weight,
            current_weight: u.weight_kg,
            bmi: u.bmi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "asha@example.in".into(),
            password_hash: "x".into(),
            name: "Asha".into(),
            age: Some(30),
            gender: Some("female".into()),
            height_cm: Some(160.0),
            weight_kg: Some(55.0),
            bmi: Some(21.48),
            dietary_prefs: None,
            goals: None,
            target_weight: None,
            is_onboarded: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn weight_change_recomputes_bmi() {
        let mut u = user();
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"weight_kg": 50, "dietary_prefs": ["veg"]}"#).unwrap();
        req.apply(&mut u).unwrap();
        assert_eq!(u.bmi, Some(19.53));
        assert_eq!(u.dietary_prefs, Some(vec!["veg".to_string()]));
        assert_eq!(u.name, "Asha");
    }

    #[test]
    fn rejects_non_positive_measurements() {
        let mut u = user();
        let req: UpdateProfileRequest = serde_json::from_str(r#"{"height_cm": 0}"#).unwrap();
        assert!(matches!(req.apply(&mut u), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn profile_hides_password_hash() {
        let json = serde_json::to_string(&UserProfile::from(user())).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"dietary_prefs\":[]"));
    }
}
