use anyhow::Context;
use city_buddies::{AppConfig, CityBuddies, HttpServer};
use std::path::PathBuf;
use tracing::info;

const ENV_CONFIG: &str = "CITY_BUDDIES_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config_path = std::env::var_os(ENV_CONFIG).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())
        .context("failed to load configuration")?;

    info!("City Buddies v{}", city_buddies::version());
    info!("SPARQL endpoint: {}", config.service.sparql_endpoint);

    let buddies = CityBuddies::from_config(&config.service)
        .context("failed to create SPARQL client")?;

    let server = HttpServer::new(config.server, buddies);
    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    Ok(())
}
