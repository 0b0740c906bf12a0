//! Nutrient and calorie normalization engine.
//!
//! Everything in here is pure: logged quantities are turned into a scale
//! factor against a catalog item's reference basis, projected across the
//! item's nutrient fields, grouped into local calendar days and summed.

pub mod aggregate;
pub mod buckets;
pub mod estimator;
pub mod projector;
pub mod units;

use rust_decimal::Decimal;
use thiserror::Error;

pub use aggregate::{sum_calories, sum_nutrients, CalorieBalance};
pub use buckets::{bucketize, Bucket, DateWindow};
pub use estimator::{estimate, Effort, Estimate, UnitMode};
pub use projector::{project, NutrientRecord};
pub use units::{max_quantity, round_quantity, scale_factor};

/// Catalog items whose values are defined per a fixed reference amount/unit.
pub trait ReferenceBasis {
    fn reference_amount(&self) -> Decimal;
    fn reference_unit(&self) -> &str;
    /// Reference-unit quantity equivalent to one `unit`, if declared.
    fn conversion_factor(&self, unit: &str) -> Option<Decimal>;
}

/// Catalog items that burn energy at a fixed rate per effort unit.
pub trait EnergyRate {
    fn unit_mode(&self) -> &str;
    fn calories_per_unit(&self) -> Decimal;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NutritionError {
    #[error("Invalid unit '{unit}' for this food item")]
    InvalidUnit { unit: String },
    #[error("{0}")]
    MissingEffortFields(&'static str),
    #[error("Unsupported workout unit '{0}'")]
    UnsupportedUnitMode(String),
    #[error("catalog data integrity violation: {0}")]
    DataIntegrity(String),
    #[error("Quantity is out of range")]
    OutOfRange,
}
