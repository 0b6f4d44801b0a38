use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use txcat::classifier::Classifier;
use txcat::config::{Config, OpenAiConfig};
use txcat::openai::OpenAiClient;
use txcat::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,txcat=debug".into()),
        )
        .init();

    let config = Config::parse();
    tracing::info!("Starting classification server with config: {:?}", config);

    if config.openai_api_key.trim().is_empty() {
        anyhow::bail!("--openai-api-key must not be empty");
    }
    if config.openai_model.trim().is_empty() {
        anyhow::bail!("--openai-model must not be empty");
    }

    let openai_config = OpenAiConfig::from(&config);
    let client = OpenAiClient::new(&openai_config)?;
    let classifier = Arc::new(Classifier::new(
        Arc::new(client),
        config.openai_model.clone(),
    ));

    let default_categories = config.parse_categories();
    if default_categories.is_empty() {
        tracing::warn!("No default categories configured; requests must carry their own");
    }

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = server::router(AppState::new(classifier, default_categories))
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.server_address()).await?;
    tracing::info!("Server running on http://{}", config.server_address());
    tracing::info!(
        "Model: {}, request timeout: {:?}",
        config.openai_model,
        openai_config.timeout
    );

    axum::serve(listener, app).await?;
    Ok(())
}
