use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EnergyRate, NutritionError};

/// How effort is counted for a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitMode {
    Reps,
    Minutes,
}

impl UnitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitMode::Reps => "reps",
            UnitMode::Minutes => "minutes",
        }
    }
}

impl fmt::Display for UnitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitMode {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reps" => Ok(UnitMode::Reps),
            "minutes" => Ok(UnitMode::Minutes),
            other => Err(NutritionError::UnsupportedUnitMode(other.to_string())),
        }
    }
}

/// Effort as submitted by the user. Which fields matter depends on the
/// workout's unit mode.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Effort {
    pub sets: Option<i32>,
    pub reps_per_set: Option<i32>,
    pub duration_minutes: Option<i32>,
}

/// Derived values frozen onto a workout log at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Estimate {
    pub mode: UnitMode,
    pub sets: Option<i32>,
    pub reps_per_set: Option<i32>,
    pub duration_minutes: Option<i32>,
    pub total_units: Option<i32>,
    pub estimated_calories: Decimal,
}

pub fn estimate<W>(workout: &W, effort: &Effort) -> Result<Estimate, NutritionError>
where
    W: EnergyRate + ?Sized,
{
    let mode: UnitMode = workout.unit_mode().parse()?;
    let rate = workout.calories_per_unit();
    if rate < Decimal::ZERO {
        return Err(NutritionError::DataIntegrity(format!(
            "calories per unit must not be negative, got {}",
            rate
        )));
    }

    match mode {
        UnitMode::Reps => {
            let (sets, reps) = match (effort.sets, effort.reps_per_set) {
                (Some(s), Some(r)) if s > 0 && r > 0 => (s, r),
                _ => {
                    return Err(NutritionError::MissingEffortFields(
                        "sets and reps_per_set are required and must be positive for this workout",
                    ))
                }
            };
            let total = sets.checked_mul(reps).ok_or(NutritionError::OutOfRange)?;
            Ok(Estimate {
                mode,
                sets: Some(sets),
                reps_per_set: Some(reps),
                duration_minutes: None,
                total_units: Some(total),
                estimated_calories: rate * Decimal::from(total),
            })
        }
        UnitMode::Minutes => {
            let minutes = match effort.duration_minutes {
                Some(m) if m > 0 => m,
                _ => {
                    return Err(NutritionError::MissingEffortFields(
                        "duration_minutes is required and must be positive for this workout",
                    ))
                }
            };
            Ok(Estimate {
                mode,
                sets: None,
                reps_per_set: None,
                duration_minutes: Some(minutes),
                total_units: None,
                estimated_calories: rate * Decimal::from(minutes),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rate(&'static str, Decimal);

    impl EnergyRate for Rate {
        fn unit_mode(&self) -> &str {
            self.0
        }
        fn calories_per_unit(&self) -> Decimal {
            self.1
        }
    }

    #[test]
    fn push_ups_three_sets_of_ten() {
        let push_ups = Rate("reps", Decimal::new(35, 2));
        let est = estimate(
            &push_ups,
            &Effort {
                sets: Some(3),
                reps_per_set: Some(10),
                duration_minutes: None,
            },
        )
        .unwrap();
        assert_eq!(est.total_units, Some(30));
        assert_eq!(est.estimated_calories, Decimal::new(105, 1));
        assert_eq!(est.duration_minutes, None);
    }

    #[test]
    fn minutes_mode_uses_duration_and_leaves_total_units_empty() {
        let plank = Rate("minutes", Decimal::from(5));
        let est = estimate(
            &plank,
            &Effort {
                duration_minutes: Some(4),
                ..Effort::default()
            },
        )
        .unwrap();
        assert_eq!(est.total_units, None);
        assert_eq!(est.duration_minutes, Some(4));
        assert_eq!(est.estimated_calories, Decimal::from(20));
    }

    #[test]
    fn reps_mode_ignores_stray_duration() {
        let squats = Rate("reps", Decimal::new(32, 2));
        let est = estimate(
            &squats,
            &Effort {
                sets: Some(2),
                reps_per_set: Some(15),
                duration_minutes: Some(10),
            },
        )
        .unwrap();
        assert_eq!(est.duration_minutes, None);
        assert_eq!(est.estimated_calories, Decimal::new(96, 1));
    }

    #[test]
    fn missing_fields_for_mode_are_rejected() {
        let reps = Rate("reps", Decimal::ONE);
        let only_sets = Effort {
            sets: Some(3),
            ..Effort::default()
        };
        assert!(matches!(
            estimate(&reps, &only_sets),
            Err(NutritionError::MissingEffortFields(_))
        ));

        let minutes = Rate("minutes", Decimal::ONE);
        let only_reps = Effort {
            sets: Some(3),
            reps_per_set: Some(10),
            duration_minutes: None,
        };
        assert!(matches!(
            estimate(&minutes, &only_reps),
            Err(NutritionError::MissingEffortFields(_))
        ));
    }

    #[test]
    fn non_positive_effort_is_rejected() {
        let reps = Rate("reps", Decimal::ONE);
        let zero_sets = Effort {
            sets: Some(0),
            reps_per_set: Some(10),
            duration_minutes: None,
        };
        assert!(estimate(&reps, &zero_sets).is_err());
    }

    #[test]
    fn unknown_mode_is_an_integrity_failure() {
        let laps = Rate("laps", Decimal::ONE);
        let err = estimate(&laps, &Effort::default()).unwrap_err();
        assert_eq!(err, NutritionError::UnsupportedUnitMode("laps".into()));
    }
}
