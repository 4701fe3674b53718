//! Fraud Check Service - Main Entry Point
//!
//! Loads the model artifact once at startup, then serves the fraud
//! check form and the JSON predict endpoint.

use anyhow::{Context, Result};
use fraud_check_service::{
    config::AppConfig,
    feature_encoder::FeatureEncoder,
    models::artifact::ModelArtifact,
    models::predictor::Predictor,
    server::{self, AppState},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    // Initialize logging; RUST_LOG overrides the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    if config.logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Starting Fraud Check Service");
    info!("Configuration loaded successfully");

    // The artifact is loaded exactly once; a missing or corrupt artifact
    // is fatal, the process cannot serve predictions without it.
    let artifact = Arc::new(
        ModelArtifact::load_with_threads(&config.model.artifact_dir, config.model.onnx_threads)
            .with_context(|| {
                format!(
                    "failed to load model artifact from {}",
                    config.model.artifact_dir
                )
            })?,
    );

    let encoder = Arc::new(FeatureEncoder::for_schema(artifact.schema().clone()));
    info!(
        "Feature encoder initialized ({} features)",
        encoder.feature_count()
    );

    let predictor = Predictor::new(artifact);

    let state = AppState { encoder, predictor };
    let app = server::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
