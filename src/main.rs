use anyhow::Result;
use mcp_city_climate::{config::Config, ingest::load_readings, service::Climate};
use rmcp::ServiceExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcp_city_climate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting MCP city climate server");

    let config = Config::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY is not set; live comparisons are disabled");
    }

    let readings = load_readings(&config.dataset_path)?;
    let climate = Climate::new(readings, config);
    let server = climate.serve(rmcp::transport::stdio()).await?;
    server.waiting().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
