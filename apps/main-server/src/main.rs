//! LifeAlign server binary.

use std::net::SocketAddr;

use align_store::{AlignStore, MemoryAlignStore, SqliteAlignStore};
use lifealign_server::{config::Config, create_app, create_state, init_tracing};

async fn run<S: AlignStore + 'static>(config: Config, store: S) -> anyhow::Result<()> {
    let state = create_state(config.clone(), store).await?;
    let app = create_app(state);

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        single_user_mode = config.single_user_mode,
        template_selection = %config.template_selection,
        "Starting LifeAlign server"
    );

    match config.database_url.clone() {
        Some(url) => {
            tracing::info!(url = %url, "Using SQLite store");
            let store = SqliteAlignStore::connect(&url).await?;
            run(config, store).await
        }
        None => {
            tracing::info!("Using in-memory store");
            run(config, MemoryAlignStore::new()).await
        }
    }
}
