//! Normalizer configuration types

use serde::{Deserialize, Serialize};

/// Names of derived calendar columns
pub const YEAR_COLUMN: &str = "year";
pub const MONTH_COLUMN: &str = "month";
pub const DAY_COLUMN: &str = "day";

/// Column names used by each normalization step
///
/// Defaults match the Zillow listing export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Scraping timestamp, decomposed into year/month/day
    pub timestamp: String,

    /// Identifier column, used as a hard row filter
    pub identifier: String,

    /// JSON column flattened right after identifier filtering
    pub search_request: String,

    /// Secondary date column
    pub on_market_date: String,

    /// Nullable integer column
    pub year_built: String,

    /// Array-like string column
    pub property_subtype: String,

    /// Boolean column
    pub is_new_construction: String,

    /// Nullable float columns
    pub float_columns: Vec<String>,

    /// Nullable integer column
    pub zipcode: String,

    /// Array-like string column
    pub price_history: String,

    /// JSON column flattened last
    pub at_a_glance_facts: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            timestamp: "scraping_datetime".to_string(),
            identifier: "zpid".to_string(),
            search_request: "zillow_search_request".to_string(),
            on_market_date: "on_market_date".to_string(),
            year_built: "year_built".to_string(),
            property_subtype: "property_subtype".to_string(),
            is_new_construction: "is_new_construction".to_string(),
            float_columns: vec![
                "latitude".to_string(),
                "price".to_string(),
                "bedrooms".to_string(),
            ],
            zipcode: "zipcode".to_string(),
            price_history: "price_history".to_string(),
            at_a_glance_facts: "at_a_glance_facts".to_string(),
        }
    }
}

impl ColumnConfig {
    /// All input columns the normalizer reads
    pub fn expected_columns(&self) -> Vec<&str> {
        let mut cols = vec![
            self.timestamp.as_str(),
            self.identifier.as_str(),
            self.search_request.as_str(),
            self.on_market_date.as_str(),
            self.year_built.as_str(),
            self.property_subtype.as_str(),
            self.is_new_construction.as_str(),
        ];
        cols.extend(self.float_columns.iter().map(String::as_str));
        cols.push(self.zipcode.as_str());
        cols.push(self.price_history.as_str());
        cols.push(self.at_a_glance_facts.as_str());
        cols
    }
}
