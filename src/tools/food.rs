//! Food catalog MCP Tools
//!
//! Catalog listing, match previews and one-off estimates. None of these touch
//! the database.

use serde::Serialize;

use crate::nutrition::{self, FoodCatalog, NutritionEstimate, ScoredKey, UnitKind};

/// One catalog row for listings
#[derive(Debug, Serialize)]
pub struct CatalogItem {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub unit: UnitKind,
    pub per: &'static str,
}

/// Response for list_food_catalog
#[derive(Debug, Serialize)]
pub struct ListCatalogResponse {
    pub items: Vec<CatalogItem>,
    pub total: usize,
}

/// Response for match_food
#[derive(Debug, Serialize)]
pub struct MatchFoodResponse {
    pub query: String,
    pub matched_key: Option<String>,
    pub confidence: f64,
    pub candidates: Vec<ScoredKey>,
}

/// Response for estimate_food
#[derive(Debug, Serialize)]
pub struct EstimateFoodResponse {
    pub item: String,
    pub quantity: Option<f64>,
    pub quantity_unit: Option<&'static str>,
    #[serde(flatten)]
    pub estimate: NutritionEstimate,
}

/// List every catalog food in declaration order, optionally filtered by a
/// case-insensitive substring and by reference unit ("100g", "ml", "pcs", ...)
pub fn list_catalog(
    catalog: &FoodCatalog,
    filter: Option<&str>,
    unit: Option<&str>,
) -> Result<ListCatalogResponse, String> {
    let filter = filter.map(|f| f.trim().to_lowercase()).filter(|f| !f.is_empty());
    let unit = unit
        .filter(|u| !u.trim().is_empty())
        .map(|u| UnitKind::from_label(u).ok_or_else(|| format!("Unknown unit '{}', expected 1, 100g or 100ml", u)))
        .transpose()?;

    let items: Vec<CatalogItem> = catalog
        .iter()
        .filter(|(name, _)| filter.as_deref().map_or(true, |f| name.contains(f)))
        .filter(|(_, record)| unit.map_or(true, |u| record.unit == u))
        .map(|(name, record)| CatalogItem {
            name: name.to_string(),
            calories: record.calories_per,
            protein: record.protein_per,
            unit: record.unit,
            per: record.unit.label(),
        })
        .collect();

    let total = items.len();
    Ok(ListCatalogResponse { items, total })
}

/// Show which key a query resolves to, plus the closest candidates
pub fn match_food(catalog: &FoodCatalog, query: &str, limit: usize) -> MatchFoodResponse {
    let result = nutrition::best_match(catalog, query);
    MatchFoodResponse {
        query: query.to_string(),
        matched_key: result.key,
        confidence: result.confidence,
        candidates: nutrition::rank(catalog, query, limit.min(catalog.len())),
    }
}

/// Estimate without logging
pub fn estimate_food(catalog: &FoodCatalog, item: &str, quantity: Option<f64>) -> EstimateFoodResponse {
    let estimate = nutrition::estimate(catalog, item, quantity);
    let quantity_unit = estimate
        .matched_key
        .as_deref()
        .and_then(|key| catalog.lookup(key))
        .map(|record| record.unit.quantity_unit());

    EstimateFoodResponse {
        item: item.to_string(),
        quantity,
        quantity_unit,
        estimate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::default_catalog;

    #[test]
    fn test_list_catalog_filter() {
        let all = list_catalog(default_catalog(), None, None).unwrap();
        assert_eq!(all.total, 28);
        assert_eq!(all.items[0].name, "chicken breast");
        assert_eq!(all.items[0].per, "100g");

        let yogurts = list_catalog(default_catalog(), Some(" Yogurt"), None).unwrap();
        let names: Vec<&str> = yogurts.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["yogurt", "greek yogurt"]);
    }

    #[test]
    fn test_list_catalog_unit_filter() {
        let pieces = list_catalog(default_catalog(), None, Some("pcs")).unwrap();
        let names: Vec<&str> = pieces.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["egg", "banana", "apple", "bread slice", "protein shake"]);

        let liquids = list_catalog(default_catalog(), None, Some("100ml")).unwrap();
        assert_eq!(liquids.total, 1);
        assert_eq!(liquids.items[0].name, "milk");

        let blank = list_catalog(default_catalog(), None, Some(" ")).unwrap();
        assert_eq!(blank.total, 28);
        assert!(list_catalog(default_catalog(), None, Some("scoop")).is_err());
    }

    #[test]
    fn test_match_food_candidates() {
        let response = match_food(default_catalog(), "chicken", 2);
        assert_eq!(response.matched_key.as_deref(), Some("chicken breast"));
        assert_eq!(response.candidates.len(), 2);
        assert_eq!(response.candidates[0].key, "chicken breast");
    }

    #[test]
    fn test_estimate_food_reports_quantity_unit() {
        let response = estimate_food(default_catalog(), "milk", Some(200.0));
        assert_eq!(response.quantity_unit, Some("ml"));
        assert_eq!(response.estimate.calories, 84);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["matched_key"], "milk");
        assert_eq!(json["protein"], 6.8);
    }

    #[test]
    fn test_estimate_food_unresolved_serializes_null_key() {
        let response = estimate_food(&FoodCatalog::empty(), "egg", None);
        assert_eq!(response.quantity_unit, None);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["matched_key"].is_null());
        assert_eq!(json["calories"], 0);
    }
}
