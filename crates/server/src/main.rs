use anyhow::{Context, Result};
use clap::Parser;
use csvedit_server::{create_router, AppState, ServerConfig};
use csvedit_sheet::{DroppedFile, Session};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let mut session = Session::with_options(config.csv_options());
    if let Some(path) = &config.file {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        session
            .load(DroppedFile::new(name, bytes))
            .with_context(|| format!("Failed to load {}", path.display()))?;
    }

    let state = AppState::new(session).with_upload_limit(config.upload_limit());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    tracing::info!(addr = %listener.local_addr()?, "csvedit-server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
