//! Reference serving units
//!
//! Every catalog record is defined against one reference serving: one piece,
//! 100 grams or 100 milliliters.

use serde::{Deserialize, Serialize};

/// Quantity basis of a food record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Values are per single item (eggs, slices, whole fruit)
    PerPiece,
    /// Values are per 100 grams (solids)
    PerHundredGrams,
    /// Values are per 100 milliliters (liquids)
    PerHundredMilliliters,
}

impl UnitKind {
    /// Amount of the unit that makes one reference serving
    pub fn reference_amount(&self) -> f64 {
        match self {
            UnitKind::PerPiece => 1.0,
            UnitKind::PerHundredGrams | UnitKind::PerHundredMilliliters => 100.0,
        }
    }

    /// Unit the user's quantity is expressed in
    pub fn quantity_unit(&self) -> &'static str {
        match self {
            UnitKind::PerPiece => "pcs",
            UnitKind::PerHundredGrams => "g",
            UnitKind::PerHundredMilliliters => "ml",
        }
    }

    /// Short label used in listings ("1", "100g", "100ml")
    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::PerPiece => "1",
            UnitKind::PerHundredGrams => "100g",
            UnitKind::PerHundredMilliliters => "100ml",
        }
    }

    /// Parse a label or unit name
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "piece" | "pcs" | "each" | "count" => Some(UnitKind::PerPiece),
            "100g" | "g" | "grams" => Some(UnitKind::PerHundredGrams),
            "100ml" | "ml" | "milliliters" | "millilitres" => Some(UnitKind::PerHundredMilliliters),
            _ => None,
        }
    }

    /// Scaling factor for a user quantity.
    ///
    /// A missing, zero or non-finite quantity means "one reference serving".
    /// Negative quantities are passed through.
    pub fn factor(&self, quantity: Option<f64>) -> f64 {
        let reference = self.reference_amount();
        let amount = match quantity {
            Some(q) if q.is_finite() && q != 0.0 => q,
            _ => reference,
        };
        amount / reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert_eq!(UnitKind::from_label("1"), Some(UnitKind::PerPiece));
        assert_eq!(UnitKind::from_label("100g"), Some(UnitKind::PerHundredGrams));
        assert_eq!(UnitKind::from_label(" 100ML "), Some(UnitKind::PerHundredMilliliters));
        assert_eq!(UnitKind::from_label("scoop"), None);
    }

    #[test]
    fn test_label_round_trips_through_from_label() {
        for kind in [UnitKind::PerPiece, UnitKind::PerHundredGrams, UnitKind::PerHundredMilliliters] {
            assert_eq!(UnitKind::from_label(kind.label()), Some(kind));
        }
    }

    #[test]
    fn test_piece_factor() {
        assert_eq!(UnitKind::PerPiece.factor(None), 1.0);
        assert_eq!(UnitKind::PerPiece.factor(Some(3.0)), 3.0);
        assert_eq!(UnitKind::PerPiece.factor(Some(0.0)), 1.0);
        assert_eq!(UnitKind::PerPiece.factor(Some(f64::NAN)), 1.0);
    }

    #[test]
    fn test_hundred_unit_factor() {
        assert_eq!(UnitKind::PerHundredGrams.factor(None), 1.0);
        assert_eq!(UnitKind::PerHundredGrams.factor(Some(50.0)), 0.5);
        assert_eq!(UnitKind::PerHundredMilliliters.factor(Some(250.0)), 2.5);
        assert_eq!(UnitKind::PerHundredMilliliters.factor(Some(0.0)), 1.0);
    }

    #[test]
    fn test_negative_quantity_passes_through() {
        assert_eq!(UnitKind::PerPiece.factor(Some(-2.0)), -2.0);
        assert_eq!(UnitKind::PerHundredGrams.factor(Some(-50.0)), -0.5);
    }
}
