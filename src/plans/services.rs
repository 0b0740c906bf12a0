use std::collections::HashMap;

use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{
    CreatePlanRequest, MealGroup, PlanDetail, PlanItemInput, PlanItemView, PlanSummary,
};
use super::repo::{self, AiPlanRecord, NewPlanItem, PlanItemEntry};
use crate::{
    ai::{CatalogLine, GeneratedPlan, PlanRequest, PlannerError, PlannerProfile},
    catalog::{self, models::FoodItem},
    error::AppError,
    food_logs::services::checked_quantity,
    nutrition::{project, scale_factor, sum_nutrients, NutrientRecord, NutritionError},
    state::AppState,
    users::model::{User, UserContext},
};

pub const MAX_GENERATED_DAYS: u32 = 7;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Day 1 is Monday; labels wrap after a week.
pub fn weekday_name(day: u32) -> &'static str {
    WEEKDAYS[(day.max(1) as usize - 1) % WEEKDAYS.len()]
}

/// Check every item against the catalog with the same rules as food logs.
pub fn validate_items(
    items: &[PlanItemInput],
    foods: &HashMap<i32, FoodItem>,
) -> Result<Vec<NewPlanItem>, AppError> {
    items
        .iter()
        .map(|item| {
            let meal_name = item.meal_name.trim();
            if meal_name.is_empty() {
                return Err(AppError::BadRequest("meal_name must not be empty".into()));
            }
            let quantity = checked_quantity(item.quantity)?;
            let food = foods
                .get(&item.food_id)
                .ok_or(AppError::NotFound("Food item"))?;
            project(food, scale_factor(food, quantity, &item.unit)?)?;
            Ok(NewPlanItem {
                meal_name: meal_name.to_string(),
                day_label: item
                    .day_label
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string),
                food_id: item.food_id,
                quantity,
                unit: item.unit.clone(),
            })
        })
        .collect()
}

/// Flatten a drafted plan into plan items labelled by weekday.
pub fn items_from_generated(plan: &GeneratedPlan) -> Vec<PlanItemInput> {
    plan.days
        .iter()
        .flat_map(|day| {
            let label = weekday_name(day.day);
            day.meals.iter().flat_map(move |meal| {
                meal.items.iter().map(move |item| PlanItemInput {
                    meal_name: meal.meal.clone(),
                    day_label: Some(label.to_string()),
                    food_id: item.food_id,
                    quantity: item.quantity,
                    unit: item.unit.clone(),
                })
            })
        })
        .collect()
}

/// Group items by (day, meal) in first-appearance order and project each one.
pub fn group_meals(
    entries: Vec<PlanItemEntry>,
) -> Result<(Vec<MealGroup>, NutrientRecord), NutritionError> {
    let mut groups: Vec<MealGroup> = Vec::new();
    let mut index: HashMap<(Option<String>, String), usize> = HashMap::new();

    for entry in entries {
        let factor = scale_factor(&entry.food, entry.quantity, &entry.unit).map_err(|e| match e {
            NutritionError::InvalidUnit { unit } => NutritionError::DataIntegrity(format!(
                "food {} no longer accepts unit '{}'",
                entry.food.id, unit
            )),
            other => other,
        })?;
        let nutrients = project(&entry.food, factor)?;

        let key = (entry.day_label.clone(), entry.meal_name.clone());
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(MealGroup {
                day_label: entry.day_label.clone(),
                meal: entry.meal_name.clone(),
                items: Vec::new(),
                totals: NutrientRecord::zero(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.totals.accumulate(&nutrients)?;
        group.items.push(PlanItemView {
            food_id: entry.food.id,
            food_name: entry.food.name,
            quantity: entry.quantity,
            unit: entry.unit,
            nutrients,
        });
    }

    let totals = sum_nutrients(groups.iter().map(|g| &g.totals))?;
    Ok((groups, totals))
}

async fn catalog_for(
    state: &AppState,
    items: &[PlanItemInput],
) -> Result<HashMap<i32, FoodItem>, AppError> {
    let mut ids: Vec<i32> = items.iter().map(|i| i.food_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let foods = catalog::repo::foods_by_ids(&state.db, &ids).await?;
    Ok(foods.into_iter().map(|f| (f.id, f)).collect())
}

pub async fn list_plans(state: &AppState, user: UserContext) -> Result<Vec<PlanSummary>, AppError> {
    let plans = repo::list(&state.db, user.id).await?;
    Ok(plans.into_iter().map(PlanSummary::from).collect())
}

pub async fn get_plan(
    state: &AppState,
    user: UserContext,
    plan_id: Uuid,
) -> Result<PlanDetail, AppError> {
    let plan = repo::get(&state.db, user.id, plan_id)
        .await?
        .ok_or(AppError::NotFound("Plan"))?;
    let entries = repo::items(&state.db, plan.id).await?;
    let (meals, totals) = group_meals(entries)?;
    Ok(PlanDetail {
        plan_id: plan.id,
        name: plan.name,
        description: plan.description,
        created_at: plan.created_at,
        meals,
        totals,
    })
}

pub async fn create_plan(
    state: &AppState,
    user: UserContext,
    req: CreatePlanRequest,
) -> Result<PlanDetail, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    let foods = catalog_for(state, &req.items).await?;
    let items = validate_items(&req.items, &foods)?;
    let plan_id = repo::create(
        &state.db,
        user.id,
        name,
        req.description.as_deref(),
        &items,
    )
    .await?;
    info!(plan_id = %plan_id, user_id = %user.id, items = items.len(), "plan created");
    get_plan(state, user, plan_id).await
}

pub async fn delete_plan(state: &AppState, user: UserContext, plan_id: Uuid) -> Result<(), AppError> {
    if !repo::delete(&state.db, user.id, plan_id).await? {
        return Err(AppError::NotFound("Plan"));
    }
    info!(plan_id = %plan_id, user_id = %user.id, "plan deleted");
    Ok(())
}

pub async fn generate_plan(
    state: &AppState,
    user: UserContext,
    days: Option<u32>,
) -> Result<PlanDetail, AppError> {
    let days = days.unwrap_or(1);
    if !(1..=MAX_GENERATED_DAYS).contains(&days) {
        return Err(AppError::BadRequest(format!(
            "days must be between 1 and {}",
            MAX_GENERATED_DAYS
        )));
    }

    let profile = User::find_by_id(&state.db, user.id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    let catalog = catalog::repo::all_foods(&state.db).await?;
    let request = PlanRequest {
        profile: PlannerProfile {
            dietary_prefs: profile.dietary_prefs.clone().unwrap_or_default(),
            goals: profile.goals.clone(),
            bmi: profile.bmi,
        },
        foods: catalog.iter().map(CatalogLine::from).collect(),
        days,
    };

    let draft = state.planner.draft(&request).await.map_err(|e| match e {
        PlannerError::NotConfigured => AppError::AiUnavailable,
        other => {
            warn!(error = %other, user_id = %user.id, "meal plan drafting failed");
            AppError::Upstream(other.to_string())
        }
    })?;

    let inputs = items_from_generated(&draft.plan);
    if inputs.is_empty() {
        return Err(AppError::Upstream("planner returned an empty plan".into()));
    }
    let foods: HashMap<i32, FoodItem> = catalog.into_iter().map(|f| (f.id, f)).collect();
    let items = validate_items(&inputs, &foods)?;

    let response = serde_json::to_value(&draft.plan).map_err(anyhow::Error::from)?;
    let name = format!("AI Meal Plan ({} day{})", days, if days == 1 { "" } else { "s" });
    let description = profile
        .goals
        .as_deref()
        .map(|g| format!("Generated for goal: {}", g));
    let plan_id = repo::create_generated(
        &state.db,
        user.id,
        &name,
        description.as_deref(),
        &items,
        AiPlanRecord {
            plan_type: "meal",
            prompt: &draft.prompt,
            response,
        },
    )
    .await?;
    info!(plan_id = %plan_id, user_id = %user.id, days, items = items.len(), "AI plan stored");
    get_plan(state, user, plan_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{GeneratedDay, GeneratedItem, GeneratedMeal};
    use crate::catalog::models::test_support::food;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    fn catalog() -> HashMap<i32, FoodItem> {
        let mut chapati = food("Chapati", 70, 40, "g");
        chapati.id = 1;
        chapati.unit_conversions = Some(BTreeMap::from([("piece".to_string(), Decimal::from(40))]));
        let mut dal = food("Dal (cooked)", 120, 100, "g");
        dal.id = 3;
        dal.vitamins = BTreeMap::from([("B9".to_string(), Decimal::from(180))]);
        HashMap::from([(1, chapati), (3, dal)])
    }

    fn input(meal: &str, food_id: i32, quantity: i64, unit: &str) -> PlanItemInput {
        PlanItemInput {
            meal_name: meal.into(),
            day_label: None,
            food_id,
            quantity: Decimal::from(quantity),
            unit: unit.into(),
        }
    }

    fn entry(meal: &str, day: Option<&str>, food_id: i32, quantity: i64, unit: &str) -> PlanItemEntry {
        PlanItemEntry {
            meal_name: meal.into(),
            day_label: day.map(str::to_string),
            quantity: Decimal::from(quantity),
            unit: unit.into(),
            food: catalog()[&food_id].clone(),
        }
    }

    #[test]
    fn weekday_labels_wrap() {
        assert_eq!(weekday_name(1), "Monday");
        assert_eq!(weekday_name(7), "Sunday");
        assert_eq!(weekday_name(8), "Monday");
        assert_eq!(weekday_name(0), "Monday");
    }

    #[test]
    fn items_follow_food_log_rules() {
        let foods = catalog();
        let ok = validate_items(&[input(" Lunch ", 1, 2, "piece")], &foods).unwrap();
        assert_eq!(ok[0].meal_name, "Lunch");

        let bad_unit = validate_items(&[input("Lunch", 1, 1, "cup")], &foods);
        assert!(matches!(
            bad_unit,
            Err(AppError::Nutrition(NutritionError::InvalidUnit { .. }))
        ));
        let unknown = validate_items(&[input("Lunch", 42, 1, "g")], &foods);
        assert!(matches!(unknown, Err(AppError::NotFound("Food item"))));
        let zero = validate_items(&[input("Lunch", 3, 0, "g")], &foods);
        assert!(matches!(zero, Err(AppError::BadRequest(_))));
        let padded = validate_items(&[input("Lunch", 3, 100, " g ")], &foods);
        assert!(matches!(
            padded,
            Err(AppError::Nutrition(NutritionError::InvalidUnit { .. }))
        ));
    }

    #[test]
    fn item_quantities_are_stored_rounded() {
        let mut item = input("Dinner", 3, 0, "g");
        item.quantity = Decimal::new(150555, 3);
        let ok = validate_items(&[item.clone()], &catalog()).unwrap();
        assert_eq!(ok[0].quantity, Decimal::new(15056, 2));

        item.quantity = Decimal::new(4, 3);
        assert!(matches!(
            validate_items(&[item.clone()], &catalog()),
            Err(AppError::BadRequest(_))
        ));
        item.quantity = Decimal::from(100_000_000);
        assert!(matches!(
            validate_items(&[item], &catalog()),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn meals_grouped_in_first_appearance_order() {
        let entries = vec![
            entry("Lunch", None, 1, 2, "piece"),
            entry("Breakfast", None, 3, 100, "g"),
            entry("Lunch", None, 3, 50, "g"),
        ];
        let (meals, totals) = group_meals(entries).unwrap();
        let names: Vec<&str> = meals.iter().map(|m| m.meal.as_str()).collect();
        assert_eq!(names, ["Lunch", "Breakfast"]);
        assert_eq!(meals[0].items.len(), 2);
        assert_eq!(meals[0].totals.calories, Decimal::from(200));
        assert_eq!(meals[0].totals.vitamins["B9"], Decimal::from(90));
        assert_eq!(totals.calories, Decimal::from(320));
        assert_eq!(totals.vitamins["B9"], Decimal::from(270));
    }

    #[test]
    fn same_meal_on_different_days_stays_apart() {
        let entries = vec![
            entry("Breakfast", Some("Monday"), 1, 1, "piece"),
            entry("Breakfast", Some("Tuesday"), 1, 1, "piece"),
        ];
        let (meals, _) = group_meals(entries).unwrap();
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[1].day_label.as_deref(), Some("Tuesday"));
    }

    #[test]
    fn generated_plan_flattens_with_day_labels() {
        let plan = GeneratedPlan {
            days: vec![
                GeneratedDay {
                    day: 1,
                    meals: vec![GeneratedMeal {
                        meal: "Breakfast".into(),
                        items: vec![GeneratedItem {
                            food_id: 1,
                            quantity: Decimal::from(2),
                            unit: "piece".into(),
                        }],
                    }],
                },
                GeneratedDay {
                    day: 2,
                    meals: vec![GeneratedMeal {
                        meal: "Dinner".into(),
                        items: vec![GeneratedItem {
                            food_id: 3,
                            quantity: Decimal::from(150),
                            unit: "g".into(),
                        }],
                    }],
                },
            ],
        };
        let items = items_from_generated(&plan);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].day_label.as_deref(), Some("Monday"));
        assert_eq!(items[1].day_label.as_deref(), Some("Tuesday"));
        assert_eq!(items[1].meal_name, "Dinner");
        assert!(validate_items(&items, &catalog()).is_ok());
    }

    #[tokio::test]
    async fn generation_is_capped_at_a_week() {
        let state = AppState::fake();
        let user = UserContext { id: Uuid::new_v4(), is_onboarded: true };
        let err = generate_plan(&state, user, Some(9)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
