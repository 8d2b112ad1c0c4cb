use std::sync::Arc;
use tracing::info;

mod chat;
mod classifier;
mod engine;
mod mood;
mod policy;
mod server;
mod session;
mod store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    if let Err(e) = dotenvy::dotenv() {
        // It's not fatal if .env doesn't exist, but good to know
        info!("No .env file found or failed to load: {}", e);
    }

    // Initialize logging with default filter if RUST_LOG is not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("Solace daemon starting...");

    let data_dir = std::env::var("SOLACE_DATA_DIR").unwrap_or_else(|_| "./data".into());
    info!("Initializing log store at {}", data_dir);
    let store = store::LogStore::new(&data_dir)?;

    // Classification degrades to the neutral fallback without a token.
    let classifiers = classifier::Classifiers::from_env();

    let engine = Arc::new(engine::Engine::new(
        classifiers,
        store,
        Box::new(policy::ThreadRngSource),
    ));

    let app = server::ApiServer::new(engine).router();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    info!("Starting API server on port {}", port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        res = axum::serve(listener, app) => {
            if let Err(e) = res {
                info!("Server stopped with error: {}", e);
            }
        }
    }

    Ok(())
}
