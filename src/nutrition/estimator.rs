//! Calorie and protein estimation
//!
//! Turns a free-text food and an optional quantity into scaled nutrition
//! figures. Never fails: an unrecognised item yields a zero estimate with no
//! matched key.

use serde::Serialize;

use super::catalog::FoodCatalog;
use super::matcher::best_match;

/// Scaled nutrition for one logged item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionEstimate {
    pub calories: i64,
    pub protein: f64, // grams, one decimal
    pub matched_key: Option<String>,
}

impl NutritionEstimate {
    /// Estimate for an item nothing in the catalog resembles
    pub fn unresolved() -> Self {
        Self {
            calories: 0,
            protein: 0.0,
            matched_key: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.matched_key.is_some()
    }
}

/// Round half up (towards positive infinity) to an integer
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round half up to one decimal place
pub fn round1(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// Estimate nutrition for `item` at `quantity`.
///
/// Quantity is pieces for per-piece foods and grams/milliliters otherwise;
/// absent or zero means one reference serving.
pub fn estimate(catalog: &FoodCatalog, item: &str, quantity: Option<f64>) -> NutritionEstimate {
    let matched = best_match(catalog, item);

    let Some(key) = matched.key else {
        tracing::debug!(item, "No catalog match");
        return NutritionEstimate::unresolved();
    };

    let Some(record) = catalog.lookup(&key) else {
        return NutritionEstimate::unresolved();
    };

    let factor = record.unit.factor(quantity);

    NutritionEstimate {
        calories: round_half_up(record.calories_per * factor) as i64,
        protein: round1(record.protein_per * factor),
        matched_key: Some(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::catalog::{default_catalog, FoodRecord};
    use crate::nutrition::units::UnitKind;

    #[test]
    fn test_piece_defaults_to_one() {
        let est = estimate(default_catalog(), "egg", None);
        assert_eq!(est.calories, 78);
        assert_eq!(est.protein, 6.0);
        assert_eq!(est.matched_key.as_deref(), Some("egg"));
    }

    #[test]
    fn test_piece_scales_by_count() {
        let est = estimate(default_catalog(), "egg", Some(3.0));
        assert_eq!(est.calories, 234);
        assert_eq!(est.protein, 18.0);
    }

    #[test]
    fn test_per_hundred_grams() {
        let est = estimate(default_catalog(), "rice cooked", Some(50.0));
        assert_eq!(est.calories, 65);
        assert_eq!(est.protein, 1.4);
        assert_eq!(est.matched_key.as_deref(), Some("rice cooked"));
    }

    #[test]
    fn test_per_hundred_defaults_to_reference_serving() {
        let est = estimate(default_catalog(), "chicken breast", None);
        assert_eq!(est.calories, 165);
        assert_eq!(est.protein, 31.0);

        let zero = estimate(default_catalog(), "chicken breast", Some(0.0));
        assert_eq!(zero, est);
    }

    #[test]
    fn test_per_hundred_milliliters() {
        let est = estimate(default_catalog(), "milk", Some(250.0));
        assert_eq!(est.calories, 105);
        assert_eq!(est.protein, 8.5);
    }

    #[test]
    fn test_fuzzy_item_uses_matched_record() {
        let est = estimate(default_catalog(), "Chicken", Some(200.0));
        assert_eq!(est.matched_key.as_deref(), Some("chicken breast"));
        assert_eq!(est.calories, 330);
        assert_eq!(est.protein, 62.0);
    }

    #[test]
    fn test_unknown_item() {
        let catalog = FoodCatalog::from_entries(vec![
            ("egg", FoodRecord::new(78.0, 6.0, UnitKind::PerPiece)),
            ("milk", FoodRecord::new(42.0, 3.4, UnitKind::PerHundredMilliliters)),
        ])
        .unwrap();
        let est = estimate(&catalog, "unobtainium bar", Some(100.0));
        assert_eq!(est, NutritionEstimate::unresolved());
        assert!(!est.is_resolved());
    }

    #[test]
    fn test_empty_catalog_is_unresolved() {
        let est = estimate(&FoodCatalog::empty(), "egg", Some(2.0));
        assert_eq!(est.calories, 0);
        assert_eq!(est.protein, 0.0);
        assert_eq!(est.matched_key, None);
    }

    #[test]
    fn test_malformed_input_still_estimates() {
        let est = estimate(default_catalog(), "İÇ 🍕\t\n", Some(f64::INFINITY));
        assert_eq!(est.matched_key.as_deref(), Some("spinach"));
        assert_eq!(est.calories, 23);
        assert_eq!(est.protein, 2.9);

        let nan = estimate(default_catalog(), "İÇ 🍕\t\n", Some(f64::NAN));
        assert_eq!(nan, est);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let a = estimate(default_catalog(), "banana", Some(2.0));
        let b = estimate(default_catalog(), "banana", Some(2.0));
        assert_eq!(a, b);
        assert_eq!(a.protein.to_bits(), b.protein.to_bits());
    }

    #[test]
    fn test_negative_quantity_propagates() {
        let est = estimate(default_catalog(), "egg", Some(-2.0));
        assert_eq!(est.calories, -156);
        assert_eq!(est.protein, -12.0);
    }

    #[test]
    fn test_rounding_is_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round1(1.35), 1.4);
        assert_eq!(round1(0.04), 0.0);
    }
}
