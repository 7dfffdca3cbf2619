//! Single-run scraper for brain.com.ua product pages.
//!
//! Fetches one product page, extracts structured attributes (title, price,
//! photos, review count, code, and a nested specification mapping with five
//! flattened fields), inserts the result as a new SQLite row, and exports
//! all accumulated rows to `results/products.csv`.

pub mod config;
pub mod database;
pub mod extract;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod traits;
