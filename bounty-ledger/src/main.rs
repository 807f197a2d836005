use std::net::SocketAddr;

use anyhow::Context;
use bounty_ledger::bootstrap::build_sandbox;
use bounty_ledger::config::Config;
use bounty_ledger::handlers::{create_router, AppState};
use shared::observability::init_logging;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = match std::env::var("CONFIG_PATH") {
        Ok(path) => Config::from_file(&path)?,
        Err(_) => Config::from_env()?,
    };
    config.validate()?;

    init_logging(config.logging.to_log_config()?).context("initializing logging")?;

    let sandbox = build_sandbox(&config)?;
    let app = create_router(AppState::from(sandbox));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server address")?;
    info!("Bounty ledger service starting on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
