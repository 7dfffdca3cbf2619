//! Data models for product records and their stored row projections

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Nested specification mapping: section title → {attribute name → value}
pub type Specifications = BTreeMap<String, BTreeMap<String, String>>;

/// One product extracted from a brain.com.ua product page.
///
/// Every field is independently optional: a selector miss leaves the field
/// empty and never aborts record construction. `sale_price` is always `None`
/// in this flow (the page never exposes one here), and the flattened fields
/// (`manufacturer`, `memory`, `color`, `screen_diagonal`, `screen_resolution`)
/// are denormalized projections of `specifications` kept alongside the full
/// mapping for query convenience.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: Option<String>,
    pub color: Option<String>,
    pub memory: Option<String>,
    pub manufacturer: Option<String>,
    pub regular_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub photos: Vec<String>,
    pub code: Option<String>,
    pub review_count: Option<i64>,
    pub screen_diagonal: Option<String>,
    pub screen_resolution: Option<String>,
    pub specifications: Specifications,
}

/// A `products` row as read back from the store, for CSV export.
///
/// `photos` and `specifications` stay in their persisted JSON text form;
/// timestamps are assigned by the store on insert.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredProduct {
    pub id: i64,
    pub title: Option<String>,
    pub color: Option<String>,
    pub memory: Option<String>,
    pub manufacturer: Option<String>,
    pub regular_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub photos: Option<String>,
    pub code: Option<String>,
    pub review_count: Option<i64>,
    pub screen_diagonal: Option<String>,
    pub screen_resolution: Option<String>,
    pub specifications: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredProduct {
    /// Database column names, in table order. Doubles as the CSV header.
    pub const COLUMNS: [&'static str; 15] = [
        "id",
        "title",
        "color",
        "memory",
        "manufacturer",
        "regular_price",
        "sale_price",
        "photos",
        "code",
        "review_count",
        "screen_diagonal",
        "screen_resolution",
        "specifications",
        "created_at",
        "updated_at",
    ];

    /// One CSV record in [`Self::COLUMNS`] order; absent fields become
    /// empty cells.
    pub fn csv_fields(&self) -> Vec<String> {
        fn opt<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(T::to_string).unwrap_or_default()
        }

        vec![
            self.id.to_string(),
            opt(&self.title),
            opt(&self.color),
            opt(&self.memory),
            opt(&self.manufacturer),
            opt(&self.regular_price),
            opt(&self.sale_price),
            opt(&self.photos),
            opt(&self.code),
            opt(&self.review_count),
            opt(&self.screen_diagonal),
            opt(&self.screen_resolution),
            opt(&self.specifications),
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339(),
        ]
    }
}
