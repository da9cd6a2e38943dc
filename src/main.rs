// counsel-ai - AI gateway, response cache and feedback analysis for the counselor scheduler

use anyhow::Result;
use clap::Parser;
use counsel_ai::cache::ResponseCache;
use counsel_ai::cli::Args;
use counsel_ai::config::AppConfig;
use counsel_ai::feedback::FeedbackAnalyzer;
use counsel_ai::gateway::{AiGateway, AzureOpenAiClient};
use counsel_ai::interaction::{InteractionLog, TracingInteractionLog};
use counsel_ai::secrets::SecretAccessor;
use counsel_ai::server::create_router;
use counsel_ai::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting counsel-ai v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Resolve the API key; absence disables AI features
    let secrets = SecretAccessor::from_store_path(config.secrets.store_path.as_deref());
    let api_key = secrets.get_secret(&config.secrets.api_key_name, Some(&config.secrets.api_key_env));

    // Phase 4: Build the gateway and analyzer
    let backend = AzureOpenAiClient::new(&config.openai, api_key)?;
    let cache = Arc::new(ResponseCache::from_config(&config.cache));
    let gateway = Arc::new(AiGateway::new(Arc::new(backend), cache, &config.openai));
    let interaction_log: Arc<dyn InteractionLog> = Arc::new(TracingInteractionLog);
    let analyzer = Arc::new(FeedbackAnalyzer::new(gateway.clone(), interaction_log.clone()));

    info!(
        capacity = config.cache.capacity,
        ttl_minutes = config.cache.ttl_minutes,
        "AI response cache ready"
    );

    // Phase 5: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(config, gateway, analyzer, interaction_log)?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 6: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
