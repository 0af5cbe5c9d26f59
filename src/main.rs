//! FlashQuery HTTP server entrypoint.

use std::net::SocketAddr;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use flashquery::config::Config;
use flashquery::gateway::{HandlerState, check_health, create_router_with_state};
use flashquery::service::FlashQuery;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        model = %config.generation_model,
        web_search = config.serpapi_key.is_some(),
        "FlashQuery starting"
    );

    if config.embedding_model_path.is_none() {
        tracing::warn!("No FLASHQUERY_EMBEDDING_MODEL_PATH configured, running embedder in stub mode");
    }
    if config.toxicity_model_path.is_none() {
        tracing::warn!("No FLASHQUERY_TOXICITY_MODEL_PATH configured, running classifier in stub mode");
    }

    let service = tokio::task::spawn_blocking({
        let config = config.clone();
        move || FlashQuery::from_config(&config)
    })
    .await??;

    let state = HandlerState::new(service, config.context_prefix_chars);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("FlashQuery shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("FLASHQUERY_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);

    if check_health(&format!("http://127.0.0.1:{}", port)).await {
        0
    } else {
        1
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
