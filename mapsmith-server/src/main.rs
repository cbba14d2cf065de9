//! Service entry point: settings, startup probes, and the axum server.

use tracing_subscriber::EnvFilter;

use mapsmith::{generate_with_retry, Settings};
use mapsmith_server::routes;
use mapsmith_server::state::AppState;

/// Prompt used to warm the model before serving traffic.
const WARMUP_PROMPT: &str = "Hello";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let bind_addr = settings.bind_addr();
    let state = AppState::new(settings);

    match state.client.model_available().await {
        Ok(true) => {
            tracing::info!(model = state.client.model(), "backend reachable, model installed");
        }
        Ok(false) => {
            tracing::warn!(
                model = state.client.model(),
                "backend reachable but model missing, install it with `ollama pull`"
            );
        }
        Err(err) => {
            tracing::warn!(
                kind = err.kind(),
                error = %err,
                "backend not reachable, start it with `ollama serve`"
            );
        }
    }

    // Warm the model so the first real request skips the cold start. The
    // warm-up rides the same bounded retry path as user traffic.
    match generate_with_retry(&state.client, WARMUP_PROMPT, state.settings.max_retries).await {
        Ok(_) => tracing::info!("model warmed up"),
        Err(err) => tracing::warn!(kind = err.kind(), error = %err, "model warm-up failed"),
    }

    let router = routes::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router).await?;

    Ok(())
}
