use rust_decimal::Decimal;
use serde::Serialize;

use super::{NutrientRecord, NutritionError};

fn add(a: Decimal, b: Decimal) -> Result<Decimal, NutritionError> {
    a.checked_add(b).ok_or(NutritionError::OutOfRange)
}

impl NutrientRecord {
    /// Add `other` into `self` field by field. On overflow `self` is left
    /// partially updated and should be discarded.
    pub fn accumulate(&mut self, other: &NutrientRecord) -> Result<(), NutritionError> {
        self.calories = add(self.calories, other.calories)?;
        self.protein = add(self.protein, other.protein)?;
        self.carbs = add(self.carbs, other.carbs)?;
        self.fats = add(self.fats, other.fats)?;
        for (name, amount) in &other.vitamins {
            let slot = self.vitamins.entry(name.clone()).or_insert(Decimal::ZERO);
            *slot = add(*slot, *amount)?;
        }
        Ok(())
    }
}

/// Field-wise sum; vitamin maps are unioned with values added per key.
pub fn sum_nutrients<'a, I>(records: I) -> Result<NutrientRecord, NutritionError>
where
    I: IntoIterator<Item = &'a NutrientRecord>,
{
    records
        .into_iter()
        .try_fold(NutrientRecord::zero(), |mut acc, record| {
            acc.accumulate(record)?;
            Ok(acc)
        })
}

pub fn sum_calories<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().sum()
}

/// Consumed vs burned energy. `net` is not clamped and goes negative when
/// more was burned than eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalorieBalance {
    pub consumed: Decimal,
    pub burned: Decimal,
    pub net: Decimal,
}

impl CalorieBalance {
    pub fn new(consumed: Decimal, burned: Decimal) -> Self {
        Self {
            consumed,
            burned,
            net: consumed - burned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(calories: i64, protein: i64, vitamins: &[(&str, i64)]) -> NutrientRecord {
        NutrientRecord {
            calories: Decimal::from(calories),
            protein: Decimal::from(protein),
            carbs: Decimal::ZERO,
            fats: Decimal::ONE,
            vitamins: vitamins
                .iter()
                .map(|(k, v)| (k.to_string(), Decimal::from(*v)))
                .collect(),
        }
    }

    #[test]
    fn empty_input_sums_to_zero_record() {
        let none: Vec<NutrientRecord> = Vec::new();
        assert_eq!(sum_nutrients(&none).unwrap(), NutrientRecord::zero());
        assert_eq!(sum_calories(Vec::<Decimal>::new()), Decimal::ZERO);
    }

    #[test]
    fn vitamin_maps_are_unioned() {
        let records = vec![
            record(100, 5, &[("A", 2), ("C", 10)]),
            record(50, 1, &[("C", 5), ("D", 1)]),
        ];
        let total = sum_nutrients(&records).unwrap();
        assert_eq!(total.calories, Decimal::from(150));
        assert_eq!(total.protein, Decimal::from(6));
        assert_eq!(total.fats, Decimal::from(2));
        assert_eq!(total.vitamins["A"], Decimal::from(2));
        assert_eq!(total.vitamins["C"], Decimal::from(15));
        assert_eq!(total.vitamins["D"], Decimal::from(1));
    }

    #[test]
    fn order_and_grouping_do_not_matter() {
        let a = record(10, 1, &[("A", 1)]);
        let b = record(20, 2, &[("B", 2)]);
        let c = record(30, 3, &[("A", 3)]);

        let forward = sum_nutrients([&a, &b, &c]).unwrap();
        let backward = sum_nutrients([&c, &b, &a]).unwrap();
        assert_eq!(forward, backward);

        let left = sum_nutrients([&sum_nutrients([&a, &b]).unwrap(), &c]).unwrap();
        let right = sum_nutrients([&a, &sum_nutrients([&b, &c]).unwrap()]).unwrap();
        assert_eq!(left, right);
        assert_eq!(left, forward);
    }

    #[test]
    fn overflowing_sum_is_out_of_range() {
        let mut big = record(0, 0, &[]);
        big.calories = Decimal::MAX;
        let one = record(1, 0, &[]);
        assert_eq!(sum_nutrients([&big, &one]), Err(NutritionError::OutOfRange));

        let mut rich = record(0, 0, &[]);
        rich.vitamins = [("C".to_string(), Decimal::MAX)].into();
        assert_eq!(sum_nutrients([&rich, &rich]), Err(NutritionError::OutOfRange));
    }

    #[test]
    fn net_calories_can_go_negative() {
        let balance = CalorieBalance::new(Decimal::from(300), Decimal::new(4505, 1));
        assert_eq!(balance.net, Decimal::new(-1505, 1));
    }
}
