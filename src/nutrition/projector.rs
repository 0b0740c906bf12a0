use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::NutritionError;
use crate::catalog::models::FoodItem;

/// Energy and macros for some amount of food.
///
/// `vitamins` is sparse: a key is present only if the source item declares it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NutrientRecord {
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fats: Decimal,
    pub vitamins: BTreeMap<String, Decimal>,
}

impl NutrientRecord {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Scale every per-reference nutrient of `item` by `factor`.
///
/// Fails with `OutOfRange` instead of overflowing when a product does not
/// fit in a `Decimal`.
pub fn project(item: &FoodItem, factor: Decimal) -> Result<NutrientRecord, NutritionError> {
    let scale = |value: Decimal| value.checked_mul(factor).ok_or(NutritionError::OutOfRange);
    Ok(NutrientRecord {
        calories: scale(item.calories)?,
        protein: scale(item.protein)?,
        carbs: scale(item.carbs)?,
        fats: scale(item.fats)?,
        vitamins: item
            .vitamins
            .iter()
            .map(|(name, amount)| Ok((name.clone(), scale(*amount)?)))
            .collect::<Result<_, NutritionError>>()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::test_support::food;
    use crate::nutrition::scale_factor;

    #[test]
    fn rice_250g_projects_to_325_kcal() {
        let rice = food("Rice (cooked)", 130, 100, "g");
        let factor = scale_factor(&rice, Decimal::from(250), "g").unwrap();
        let projected = project(&rice, factor).unwrap();
        assert_eq!(projected.calories, Decimal::from(325));
    }

    #[test]
    fn two_chapati_pieces_project_to_140_kcal() {
        let mut chapati = food("Chapati", 70, 40, "g");
        chapati.unit_conversions = Some([("piece".to_string(), Decimal::from(40))].into());
        let factor = scale_factor(&chapati, Decimal::from(2), "piece").unwrap();
        assert_eq!(factor, Decimal::from(2));
        assert_eq!(project(&chapati, factor).unwrap().calories, Decimal::from(140));
    }

    #[test]
    fn doubling_quantity_doubles_every_field() {
        let mut paneer = food("Paneer", 265, 100, "g");
        paneer.protein = Decimal::from(18);
        paneer.carbs = Decimal::new(12, 1);
        paneer.fats = Decimal::from(21);
        paneer.vitamins = [
            ("A".to_string(), Decimal::new(21, 2)),
            ("B12".to_string(), Decimal::new(8, 1)),
        ]
        .into();

        let single = project(&paneer, scale_factor(&paneer, Decimal::from(75), "g").unwrap()).unwrap();
        let double = project(&paneer, scale_factor(&paneer, Decimal::from(150), "g").unwrap()).unwrap();

        let two = Decimal::from(2);
        assert_eq!(double.calories, single.calories * two);
        assert_eq!(double.protein, single.protein * two);
        assert_eq!(double.carbs, single.carbs * two);
        assert_eq!(double.fats, single.fats * two);
        for (name, amount) in &single.vitamins {
            assert_eq!(double.vitamins[name], *amount * two);
        }
    }

    #[test]
    fn vitamins_are_not_zero_filled() {
        let mut banana = food("Banana", 105, 118, "g");
        banana.vitamins = [("C".to_string(), Decimal::new(103, 1))].into();
        let projected = project(&banana, Decimal::ONE).unwrap();
        assert_eq!(projected.vitamins.len(), 1);
        assert!(!projected.vitamins.contains_key("A"));

        let plain = food("Dal (cooked)", 120, 100, "g");
        assert!(project(&plain, Decimal::ONE).unwrap().vitamins.is_empty());
    }

    #[test]
    fn overflowing_projection_is_out_of_range() {
        let paneer = food("Paneer", 265, 100, "g");
        let huge = "70000000000000000000000000000".parse::<Decimal>().unwrap();
        let factor = scale_factor(&paneer, huge, "g").unwrap();
        assert_eq!(project(&paneer, factor), Err(NutritionError::OutOfRange));

        let mut fortified = food("Fortified flour", 0, 100, "g");
        fortified.vitamins = [("D".to_string(), Decimal::MAX)].into();
        assert_eq!(
            project(&fortified, Decimal::TWO),
            Err(NutritionError::OutOfRange)
        );
    }
}
