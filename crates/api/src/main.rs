//! Face Classifier - Main Entry Point

use api::config::CONFIG_PATH_ENV;
use api::{init_logging, run_server, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var(CONFIG_PATH_ENV).ok();
    let config = AppConfig::load(config_path.as_deref())?;

    init_logging(&config.logging)?;

    info!("=== Face Classifier v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Model {} with labels {:?}",
        config.model.path, config.model.labels
    );

    if let Err(e) = run_server(config).await {
        error!("Server exited with error: {}", e);
        return Err(e);
    }

    Ok(())
}
