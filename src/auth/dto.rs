use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::users::{
    dto::UserProfile,
    model::{compute_bmi, DietaryPreference, Gender, Goal},
    repo::Onboarding,
};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response returned after login, register or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    pub age: i32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    #[serde(default)]
    pub dietary_prefs: Option<Vec<DietaryPreference>>,
    #[serde(default)]
    pub goals: Option<Goal>,
}

impl OnboardingRequest {
    pub fn validate(&self) -> Result<Onboarding<'static>, AppError> {
        if self.age <= 0 {
            return Err(AppError::BadRequest("age must be positive".into()));
        }
        if self.height_cm <= 0.0 || self.weight_kg <= 0.0 {
            return Err(AppError::BadRequest(
                "height_cm and weight_kg must be positive".into(),
            ));
        }
        Ok(Onboarding {
            age: self.age,
            gender: self.gender.as_str(),
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            bmi: compute_bmi(self.height_cm, self.weight_kg),
            dietary_prefs: self
                .dietary_prefs
                .as_ref()
                .map(|prefs| prefs.iter().map(|p| p.as_str().to_string()).collect()),
            goals: self.goals.map(Goal::as_str),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onboarding_computes_bmi() {
        let req: OnboardingRequest = serde_json::from_str(
            r#"{"age": 28, "gender": "male", "height_cm": 175, "weight_kg": 70,
                "dietary_prefs": ["veg", "vegan"], "goals": "weight loss"}"#,
        )
        .unwrap();
        let o = req.validate().unwrap();
        assert_eq!(o.bmi, Some(22.86));
        assert_eq!(o.gender, "male");
        assert_eq!(o.goals, Some("weight loss"));
        assert_eq!(o.dietary_prefs.unwrap(), vec!["veg", "vegan"]);
    }

    #[test]
    fn onboarding_rejects_bad_values() {
        let req: OnboardingRequest = serde_json::from_str(
            r#"{"age": 0, "gender": "female", "height_cm": 160, "weight_kg": 50}"#,
        )
        .unwrap();
        assert!(matches!(req.validate(), Err(AppError::BadRequest(_))));

        let unknown_goal = serde_json::from_str::<OnboardingRequest>(
            r#"{"age": 20, "gender": "female", "height_cm": 160, "weight_kg": 50, "goals": "bulk"}"#,
        );
        assert!(unknown_goal.is_err());
    }
}
