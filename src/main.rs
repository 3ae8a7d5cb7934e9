use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{fmt, EnvFilter};

use cozycraft::{
    config::Config,
    gemini::GeminiClient,
    huggingface::HuggingFaceClient,
    pipeline::DesignPipeline,
    prompt::PromptComposer,
    routes::{router, AppState},
    synthesizer::ImageSynthesizer,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;

    let text = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_base.clone(),
        config.gemini_model.clone(),
        config.text_timeout,
    );
    let images = HuggingFaceClient::new(
        config.huggingface_api_key.clone(),
        config.huggingface_model_url.clone(),
        config.image_timeout,
    );
    let state = AppState {
        pipeline: Arc::new(DesignPipeline::new(
            PromptComposer::new(Arc::new(text)),
            ImageSynthesizer::new(Arc::new(images)),
        )),
    };

    let origin: HeaderValue = config
        .cors_origin
        .parse()
        .with_context(|| format!("CORS_ORIGIN is not a valid origin: {}", config.cors_origin))?;
    let app = router(state).layer(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "🎨 CozyCraft server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("👋 Shutting down");
}
