use std::path::Path;

use anyhow::Result;
use scraper::Html;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::database::{Database, write_csv};
use crate::extract;
use crate::fetcher::Fetcher;
use crate::traits::ProductStore;

/// Fixed destination for the CSV export.
pub const EXPORT_PATH: &str = "results/products.csv";

/// One-shot scraping pipeline: fetch, parse, extract, persist, export.
pub struct Pipeline {
    config: Config,
    fetcher: Fetcher,
    database: Database,
}

impl Pipeline {
    pub async fn new(config: Config) -> Result<Self> {
        let fetcher = Fetcher::new()?;
        let database = Database::new(&config.database_url).await?;

        Ok(Self {
            config,
            fetcher,
            database,
        })
    }

    /// Run the pipeline once. A fetch failure is a hard stop: nothing
    /// downstream runs without HTML.
    pub async fn run(&self) -> Result<()> {
        let html = self.fetcher.fetch(&self.config.url).await?;
        process_html(&html, &self.database, Path::new(EXPORT_PATH)).await
    }
}

/// Parse the page, assemble the record, persist it, then export all
/// committed rows to CSV.
///
/// A persistence failure drops the record but export still runs over
/// previously committed rows; the insert error resurfaces afterwards so
/// the process exits non-zero. An empty store or a CSV write failure is
/// logged and not fatal.
pub async fn process_html<S: ProductStore>(
    html: &str,
    store: &S,
    export_path: &Path,
) -> Result<()> {
    let document = Html::parse_document(html);
    let record = extract::collect_product_data(&document);

    let inserted = match store.insert(&record).await {
        Ok(id) => {
            info!("Product saved to database with ID: {id}");
            Ok(())
        }
        Err(e) => {
            error!("Failed to save product to database: {e}");
            Err(e)
        }
    };

    match store.export_all().await {
        Ok(rows) if rows.is_empty() => warn!("No products found in database to export"),
        Ok(rows) => match write_csv(&rows, export_path) {
            Ok(()) => info!("Successfully exported {} products to CSV", rows.len()),
            Err(e) => error!("Failed to export products to CSV: {e}"),
        },
        Err(e) => error!("Failed to export products to CSV: {e}"),
    }

    info!("Finished");
    inserted
}
