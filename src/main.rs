use tracing::info;
use udf_feed::config::fetch_config;
use udf_feed::{Feed, UdfError};

#[tokio::main]
async fn main() -> Result<(), UdfError> {
    // Initialize tracing subscriber for logging output.
    tracing_subscriber::fmt::init();

    let app_config = fetch_config()?;
    let feed = Feed::from_config(&app_config)?;
    feed.start();

    let snapshot = feed.catalog().snapshot().await;
    let status = feed.catalog_status();
    info!(
        symbols = snapshot.len(),
        failures = status.consecutive_failures,
        "Initial symbol catalog loaded"
    );

    println!("{}", serde_json::to_string_pretty(&feed.config())?);

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    feed.stop();

    Ok(())
}
