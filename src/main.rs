use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();
    cm_api::server::init_tracing();

    let config = cm_api::config::config().clone();
    info!("Starting cm-api in {:?} mode", config.environment);

    cm_api::serve(config).await
}
