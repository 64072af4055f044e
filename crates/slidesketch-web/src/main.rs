use std::sync::Arc;

use slidesketch_core::OpenAiBackend;
use slidesketch_core::config_file;
use tracing_subscriber::EnvFilter;

mod app;
mod handlers;
mod models;
mod settings;
mod state;

use settings::ServerSettings;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    let file = config_file::load_config();
    let config = file.to_config().with_env(|name| std::env::var(name).ok());
    let settings = ServerSettings::resolve(file.server.as_ref(), |name| std::env::var(name).ok());

    if config.api_key().is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; extraction requests will fail with 500");
    }
    tracing::info!(?config, "configuration loaded");

    let backend = Arc::new(OpenAiBackend::from_config(&config));
    let state = Arc::new(AppState { config, backend });
    let app = app::router(state, settings.max_body_bytes);

    let addr = settings.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
