use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, migrate::MigrateDatabase};
use tracing::info;

use crate::models::{ProductRecord, StoredProduct};
use crate::traits::ProductStore;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(db_url: &str) -> Result<Self> {
        // Create database file (and its directory) if it doesn't exist
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            info!("Creating database file");
            ensure_parent_dir(db_url)?;
            Sqlite::create_database(db_url).await?;
        }

        let pool = SqlitePool::connect(db_url).await?;

        // Run migrations
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("Database initialized successfully");
        Ok(Self { pool })
    }
}

fn ensure_parent_dir(db_url: &str) -> Result<()> {
    let Some(path) = db_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let path = path.trim_start_matches("//");
    if path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[async_trait]
impl ProductStore for Database {
    async fn insert(&self, record: &ProductRecord) -> Result<i64> {
        let now = Utc::now();
        let photos = serde_json::to_string(&record.photos)?;
        let specifications = serde_json::to_string(&record.specifications)?;

        let result = sqlx::query(
            r"
            INSERT INTO products (
                title, color, memory, manufacturer, regular_price, sale_price,
                photos, code, review_count, screen_diagonal, screen_resolution,
                specifications, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&record.title)
        .bind(&record.color)
        .bind(&record.memory)
        .bind(&record.manufacturer)
        .bind(record.regular_price)
        .bind(record.sale_price)
        .bind(photos)
        .bind(&record.code)
        .bind(record.review_count)
        .bind(&record.screen_diagonal)
        .bind(&record.screen_resolution)
        .bind(specifications)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn export_all(&self) -> Result<Vec<StoredProduct>> {
        let rows = sqlx::query_as::<_, StoredProduct>("SELECT * FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

/// Write stored rows to a CSV file with column names as the header,
/// creating the parent directory if needed.
pub fn write_csv(rows: &[StoredProduct], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(StoredProduct::COLUMNS)?;
    for row in rows {
        writer.write_record(row.csv_fields())?;
    }
    writer.flush()?;

    Ok(())
}
