use tracing::info;

use crate::config;

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = config::config().clone();
    if let Some(port) = port {
        config.api.port = port;
    }
    info!("Starting cm-api in {:?} mode", config.environment);
    crate::serve(config).await
}
