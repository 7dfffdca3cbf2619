use anyhow::Result;
use tracing::info;

use brain_scraper::config::Config;
use brain_scraper::pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("Starting brain.com.ua product page scraper");

    let config = Config::from_env()?;
    let pipeline = Pipeline::new(config).await?;

    pipeline.run().await
}
