use super::model::User;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, password_hash, name, age, gender, height_cm, weight_kg, bmi, \
     dietary_prefs, goals, target_weight, is_onboarded, created_at";

/// Fields written when onboarding completes.
pub struct Onboarding<'a> {
    pub age: i32,
    pub gender: &'a str,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: Option<f64>,
    pub dietary_prefs: Option<Vec<String>>,
    pub goals: Option<&'a str>,
}

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new, not yet onboarded user with a hashed password.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, name, is_onboarded)
            VALUES ($1, $2, $3, FALSE)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn complete_onboarding(
        db: &PgPool,
        id: Uuid,
        o: Onboarding<'_>,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET age = $2, gender = $3, height_cm = $4, weight_kg = $5, bmi = $6,
                   dietary_prefs = $7, goals = $8, is_onboarded = TRUE
             WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(o.age)
        .bind(o.gender)
        .bind(o.height_cm)
        .bind(o.weight_kg)
        .bind(o.bmi)
        .bind(o.dietary_prefs)
        .bind(o.goals)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Persist profile fields of an already loaded and modified user.
    pub async fn save_profile(db: &PgPool, user: &User) -> anyhow::Result<User> {
        let saved = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET name = $2, age = $3, height_cm = $4, weight_kg = $5, bmi = $6,
                   dietary_prefs = $7, goals = $8, target_weight = $9
             WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(user.age)
        .bind(user.height_cm)
        .bind(user.weight_kg)
        .bind(user.bmi)
        .bind(&user.dietary_prefs)
        .bind(&user.goals)
        .bind(user.target_weight)
        .fetch_one(db)
        .await?;
        Ok(saved)
    }
}
