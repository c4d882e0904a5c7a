//! Food catalog
//!
//! Read-only nutrition reference data keyed by canonical food name. Entry
//! order is significant: the matcher breaks score ties by it.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;
use thiserror::Error;

use super::units::UnitKind;

/// Catalog construction errors
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Duplicate catalog key: {0}")]
    DuplicateKey(String),

    #[error("Catalog keys must not be blank")]
    EmptyKey,
}

/// Nutrition facts for one reference serving
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FoodRecord {
    pub calories_per: f64,
    pub protein_per: f64, // grams
    pub unit: UnitKind,
}

impl FoodRecord {
    pub const fn new(calories_per: f64, protein_per: f64, unit: UnitKind) -> Self {
        Self {
            calories_per,
            protein_per,
            unit,
        }
    }
}

/// Canonical form of a catalog key: lowercase, single spaces, trimmed
pub fn canonical_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered, immutable food table
#[derive(Debug, Clone, Default)]
pub struct FoodCatalog {
    entries: Vec<(String, FoodRecord)>,
    index: HashMap<String, usize>,
}

impl FoodCatalog {
    /// An empty catalog. Nothing ever matches against it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog, preserving the given order
    pub fn from_entries<I, S>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (S, FoodRecord)>,
        S: AsRef<str>,
    {
        let mut catalog = Self::default();

        for (name, record) in entries {
            let key = canonical_key(name.as_ref());
            if key.is_empty() {
                return Err(CatalogError::EmptyKey);
            }
            if catalog.index.contains_key(&key) {
                return Err(CatalogError::DuplicateKey(key));
            }
            catalog.index.insert(key.clone(), catalog.entries.len());
            catalog.entries.push((key, record));
        }

        Ok(catalog)
    }

    /// Look up a record by name (case and spacing insensitive)
    pub fn lookup(&self, key: &str) -> Option<&FoodRecord> {
        self.index
            .get(&canonical_key(key))
            .map(|&i| &self.entries[i].1)
    }

    /// Keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FoodRecord)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reference foods, approximate values.
/// Per 100g unless the unit says otherwise.
const REFERENCE_FOODS: &[(&str, FoodRecord)] = &[
    ("chicken breast", FoodRecord::new(165.0, 31.0, UnitKind::PerHundredGrams)),
    ("rice cooked", FoodRecord::new(130.0, 2.7, UnitKind::PerHundredGrams)),
    ("brown rice cooked", FoodRecord::new(123.0, 2.6, UnitKind::PerHundredGrams)),
    ("egg", FoodRecord::new(78.0, 6.0, UnitKind::PerPiece)),
    ("banana", FoodRecord::new(105.0, 1.3, UnitKind::PerPiece)),
    ("apple", FoodRecord::new(95.0, 0.5, UnitKind::PerPiece)),
    ("oats", FoodRecord::new(389.0, 17.0, UnitKind::PerHundredGrams)),
    ("milk", FoodRecord::new(42.0, 3.4, UnitKind::PerHundredMilliliters)),
    ("yogurt", FoodRecord::new(59.0, 10.0, UnitKind::PerHundredGrams)),
    ("greek yogurt", FoodRecord::new(97.0, 9.0, UnitKind::PerHundredGrams)),
    ("salmon", FoodRecord::new(208.0, 20.0, UnitKind::PerHundredGrams)),
    ("broccoli", FoodRecord::new(55.0, 3.7, UnitKind::PerHundredGrams)),
    ("bread slice", FoodRecord::new(79.0, 3.5, UnitKind::PerPiece)),
    ("butter", FoodRecord::new(717.0, 0.9, UnitKind::PerHundredGrams)),
    ("peanut butter", FoodRecord::new(588.0, 25.0, UnitKind::PerHundredGrams)),
    ("protein shake", FoodRecord::new(120.0, 24.0, UnitKind::PerPiece)),
    ("pasta cooked", FoodRecord::new(157.0, 5.8, UnitKind::PerHundredGrams)),
    ("potato boiled", FoodRecord::new(87.0, 1.9, UnitKind::PerHundredGrams)),
    ("chickpeas cooked", FoodRecord::new(164.0, 8.9, UnitKind::PerHundredGrams)),
    ("lentils cooked", FoodRecord::new(116.0, 9.0, UnitKind::PerHundredGrams)),
    ("tofu firm", FoodRecord::new(144.0, 17.0, UnitKind::PerHundredGrams)),
    ("paneer", FoodRecord::new(296.0, 18.0, UnitKind::PerHundredGrams)),
    ("curd", FoodRecord::new(98.0, 11.0, UnitKind::PerHundredGrams)),
    ("spinach", FoodRecord::new(23.0, 2.9, UnitKind::PerHundredGrams)),
    ("beef lean", FoodRecord::new(250.0, 26.0, UnitKind::PerHundredGrams)),
    ("mutton", FoodRecord::new(294.0, 25.0, UnitKind::PerHundredGrams)),
    ("turkey breast", FoodRecord::new(135.0, 29.0, UnitKind::PerHundredGrams)),
    ("prawns", FoodRecord::new(99.0, 24.0, UnitKind::PerHundredGrams)),
];

static DEFAULT_CATALOG: LazyLock<FoodCatalog> = LazyLock::new(|| {
    let mut catalog = FoodCatalog::default();
    for (i, (name, record)) in REFERENCE_FOODS.iter().enumerate() {
        catalog.index.insert((*name).to_string(), i);
        catalog.entries.push(((*name).to_string(), *record));
    }
    catalog
});

/// The built-in reference catalog
pub fn default_catalog() -> &'static FoodCatalog {
    &DEFAULT_CATALOG
}
