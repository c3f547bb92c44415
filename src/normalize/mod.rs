//! Record normalizer module
//!
//! Best-effort cleaning of listing batches.
//!
//! # Overview
//!
//! [`normalize`] runs these steps in order:
//!
//! 1. Parse the scraping timestamp, derive `year`/`month`/`day`, drop rows
//!    where it does not parse
//! 2. Drop rows with a non-numeric `zpid`, convert survivors to integers
//! 3. Flatten `zillow_search_request`
//! 4. Coerce `on_market_date` to a date-time
//! 5. Coerce `year_built` to a nullable integer
//! 6. Parse `property_subtype` array literals
//! 7. Keep `is_new_construction` only where it is already a boolean
//! 8. Coerce `latitude`, `price`, `bedrooms` to nullable floats
//! 9. Coerce `zipcode` to a nullable integer
//! 10. Parse `price_history` array literals
//! 11. Flatten `at_a_glance_facts`
//!
//! Nothing in this module performs I/O or returns an error.

mod coerce;
mod flatten;
mod literal;
mod normalizer;
mod types;

pub use coerce::{
    is_numeric, parse_datetime, parse_datetime_str, parse_number, to_array, to_bool,
    to_datetime, to_nullable_float, to_nullable_int,
};
pub use flatten::{flatten_json_column, flatten_object, PATH_SEPARATOR};
pub use literal::{parse_literal, LiteralError};
pub use normalizer::{
    coerce_array, coerce_bool, coerce_datetime, coerce_float, coerce_int, decompose_timestamp,
    filter_identifier, normalize, Normalizer,
};
pub use types::{ColumnConfig, DAY_COLUMN, MONTH_COLUMN, YEAR_COLUMN};

#[cfg(test)]
mod tests;
