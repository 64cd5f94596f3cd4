use anyhow::{anyhow, Context};
use shared::{init_tracing, Config};
use tokio::net::TcpListener;
use tracing::info;

use todo_api::{app_with_timeout, connect_store, server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env があれば読み込む（無くてもよい）
    dotenvy::dotenv().ok();

    init_tracing().map_err(|e| anyhow!("failed to initialize tracing: {e}"))?;

    let config = Config::from_env()?;
    info!(
        database = %config.database,
        collection = %config.collection,
        "Connecting to todo store"
    );

    let store = connect_store(&config)
        .await
        .context("failed to connect to todo store")?;
    let state = AppState::new(store).context("failed to load page templates")?;
    let router = app_with_timeout(state, config.request_timeout);

    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    info!(addr = %listener.local_addr()?, "Listening");

    server::serve(
        listener,
        router,
        server::shutdown_signal(),
        config.shutdown_grace,
    )
    .await?;

    info!("Server stopped");
    Ok(())
}
