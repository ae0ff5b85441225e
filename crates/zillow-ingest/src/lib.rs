//! Acquisition of the raw Zillow wide table.

pub mod cache;
pub mod polars_utils;
pub mod query;
pub mod source;

pub use cache::{load_zillow_data, read_cached_frame, write_cached_frame};
pub use polars_utils::format_numeric;
pub use query::{QUERY_LAND_USE_CODES, ZILLOW_QUERY};
pub use source::{RecordSource, SqliteSource};
