use rust_decimal::{Decimal, RoundingStrategy};

use super::{NutritionError, ReferenceBasis};

/// Decimal places kept for logged and planned quantities (`NUMERIC(10, 2)`).
pub const QUANTITY_SCALE: u32 = 2;

/// Largest storable quantity, 99999999.99.
pub fn max_quantity() -> Decimal {
    Decimal::new(9_999_999_999, QUANTITY_SCALE)
}

/// Round a quantity the way Postgres stores it in a `NUMERIC(_, 2)` column.
pub fn round_quantity(quantity: Decimal) -> Decimal {
    quantity.round_dp_with_strategy(QUANTITY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Ratio of the logged quantity (converted to the reference unit) to the
/// item's reference amount.
///
/// Quantities are assumed positive; that is checked where requests come in.
pub fn scale_factor<B>(item: &B, quantity: Decimal, unit: &str) -> Result<Decimal, NutritionError>
where
    B: ReferenceBasis + ?Sized,
{
    let reference_amount = item.reference_amount();
    if reference_amount <= Decimal::ZERO {
        return Err(NutritionError::DataIntegrity(format!(
            "reference amount must be positive, got {}",
            reference_amount
        )));
    }

    let converted = if unit == item.reference_unit() {
        quantity
    } else {
        let factor = item
            .conversion_factor(unit)
            .ok_or_else(|| NutritionError::InvalidUnit {
                unit: unit.to_string(),
            })?;
        if factor <= Decimal::ZERO {
            return Err(NutritionError::DataIntegrity(format!(
                "conversion factor for '{}' must be positive, got {}",
                unit, factor
            )));
        }
        quantity
            .checked_mul(factor)
            .ok_or(NutritionError::OutOfRange)?
    };

    converted
        .checked_div(reference_amount)
        .ok_or(NutritionError::OutOfRange)
}
