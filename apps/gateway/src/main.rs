mod config;
mod errors;
mod gateway;
mod llm_client;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::{AppState, GatewaySettings};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recruiting gateway v{}", env!("CARGO_PKG_VERSION"));

    if config.replicate_api_token.is_none() {
        warn!("REPLICATE_API_TOKEN is not set");
    }
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; /generate-image-question will fail");
    }

    // Initialize LLM client once; every request shares it
    let llm = LlmClient::new(&config)?;
    info!("LLM client initialized (model: {})", llm.text_model());

    let settings = GatewaySettings {
        variant: config.variant,
        shuffle_options: config.shuffle_options,
    };
    info!(
        "Prompt variant: {:?}, option shuffling: {}",
        settings.variant, settings.shuffle_options
    );

    let state = AppState {
        provider: Arc::new(llm),
        settings,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
