use std::collections::BTreeMap;

use anyhow::Context;
use rust_decimal::Decimal;
use sqlx::{types::Json, PgPool};
use tracing::info;

struct SeedFood {
    name: &'static str,
    calories: Decimal,
    protein: Decimal,
    carbs: Decimal,
    fats: Decimal,
    reference_amount: i64,
    reference_unit: &'static str,
    conversions: &'static [(&'static str, i64)],
}

struct SeedWorkout {
    name: &'static str,
    unit: &'static str,
    calories_per_unit: Decimal,
    muscle_groups: &'static [&'static str],
    difficulty: &'static str,
}

/// `tenths(25)` is 2.5.
fn tenths(n: i64) -> Decimal {
    Decimal::new(n, 1)
}

fn foods() -> Vec<SeedFood> {
    vec![
        SeedFood { name: "Chapati", calories: tenths(700), protein: tenths(25), carbs: tenths(150), fats: tenths(5), reference_amount: 40, reference_unit: "g", conversions: &[("piece", 40)] },
        SeedFood { name: "Rice (cooked)", calories: tenths(1300), protein: tenths(27), carbs: tenths(280), fats: tenths(3), reference_amount: 100, reference_unit: "g", conversions: &[] },
        SeedFood { name: "Dal (cooked)", calories: tenths(1200), protein: tenths(90), carbs: tenths(200), fats: tenths(20), reference_amount: 100, reference_unit: "g", conversions: &[] },
        SeedFood { name: "Paneer", calories: tenths(2650), protein: tenths(180), carbs: tenths(12), fats: tenths(210), reference_amount: 100, reference_unit: "g", conversions: &[] },
        SeedFood { name: "Banana", calories: tenths(1050), protein: tenths(13), carbs: tenths(270), fats: tenths(3), reference_amount: 118, reference_unit: "g", conversions: &[("piece", 118)] },
        SeedFood { name: "Milk", calories: tenths(600), protein: tenths(32), carbs: tenths(50), fats: Decimal::new(325, 2), reference_amount: 100, reference_unit: "ml", conversions: &[("cup", 240)] },
    ]
}

fn workouts() -> Vec<SeedWorkout> {
    vec![
        SeedWorkout { name: "Push-ups", unit: "reps", calories_per_unit: Decimal::new(35, 2), muscle_groups: &["chest", "triceps", "shoulders"], difficulty: "medium" },
        SeedWorkout { name: "Squats", unit: "reps", calories_per_unit: Decimal::new(32, 2), muscle_groups: &["legs", "glutes"], difficulty: "easy" },
        SeedWorkout { name: "Jumping Jacks", unit: "minutes", calories_per_unit: tenths(80), muscle_groups: &["full body"], difficulty: "easy" },
        SeedWorkout { name: "Surya Namaskar", unit: "reps", calories_per_unit: tenths(40), muscle_groups: &["full body", "yoga"], difficulty: "medium" },
        SeedWorkout { name: "Plank", unit: "minutes", calories_per_unit: tenths(50), muscle_groups: &["core", "abs"], difficulty: "medium" },
        SeedWorkout { name: "Lunges", unit: "reps", calories_per_unit: Decimal::new(35, 2), muscle_groups: &["legs", "glutes"], difficulty: "medium" },
        SeedWorkout { name: "Mountain Climbers", unit: "minutes", calories_per_unit: tenths(100), muscle_groups: &["core", "cardio"], difficulty: "hard" },
        SeedWorkout { name: "Burpees", unit: "reps", calories_per_unit: tenths(10), muscle_groups: &["full body"], difficulty: "hard" },
        SeedWorkout { name: "Cycling (indoor)", unit: "minutes", calories_per_unit: tenths(75), muscle_groups: &["legs", "cardio"], difficulty: "easy" },
        SeedWorkout { name: "Yoga (general)", unit: "minutes", calories_per_unit: tenths(30), muscle_groups: &["flexibility", "calm"], difficulty: "easy" },
    ]
}

/// Insert the built-in catalog. Existing names are left untouched, so this
/// is safe to run on every start.
pub async fn seed_catalog(db: &PgPool) -> anyhow::Result<()> {
    let mut tx = db.begin().await.context("begin seed tx")?;

    let mut inserted_foods = 0u64;
    for f in foods() {
        let conversions: Option<Json<BTreeMap<String, Decimal>>> = if f.conversions.is_empty() {
            None
        } else {
            Some(Json(
                f.conversions
                    .iter()
                    .map(|(unit, qty)| (unit.to_string(), Decimal::from(*qty)))
                    .collect(),
            ))
        };
        let done = sqlx::query(
            r#"
            INSERT INTO food_items
                (name, calories, protein, carbs, fats, vitamins, reference_amount, reference_unit, unit_conversions)
            VALUES ($1, $2, $3, $4, $5, '{}'::jsonb, $6, $7, $8)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(f.name)
        .bind(f.calories)
        .bind(f.protein)
        .bind(f.carbs)
        .bind(f.fats)
        .bind(Decimal::from(f.reference_amount))
        .bind(f.reference_unit)
        .bind(conversions)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("seed food {}", f.name))?;
        inserted_foods += done.rows_affected();
    }

    let mut inserted_workouts = 0u64;
    for w in workouts() {
        let muscles: Vec<String> = w.muscle_groups.iter().map(|m| m.to_string()).collect();
        let done = sqlx::query(
            r#"
            INSERT INTO workouts (name, unit, calories_per_unit, muscle_groups, difficulty)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(w.name)
        .bind(w.unit)
        .bind(w.calories_per_unit)
        .bind(muscles)
        .bind(w.difficulty)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("seed workout {}", w.name))?;
        inserted_workouts += done.rows_affected();
    }

    tx.commit().await.context("commit seed tx")?;
    info!(foods = inserted_foods, workouts = inserted_workouts, "catalog seeded");
    Ok(())
}
