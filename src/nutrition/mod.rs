//! Nutrition estimation module
//!
//! Food catalog, free-text matcher and calorie/protein estimator.

pub mod catalog;
pub mod estimator;
pub mod matcher;
pub mod units;

pub use catalog::{canonical_key, default_catalog, CatalogError, FoodCatalog, FoodRecord};
pub use estimator::{estimate, round1, round_half_up, NutritionEstimate};
pub use matcher::{best_match, match_key, rank, score, MatchResult, ScoredKey, ACCEPTANCE_FLOOR};
pub use units::UnitKind;
