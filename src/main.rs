use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use filestore_core::CoreConfig;

/// Main entry point for the file store server
///
/// Resolves configuration once from the environment (and an optional `.env` file), then
/// serves the REST API until the process is stopped.
///
/// # Environment Variables
/// - `FILESTORE_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `FILES_STORAGE_PATH`: Storage root directory (default: "/app/files")
/// - `POD_NAME`, `NODE_NAME`: Deployment identifiers reported by `/health/` (default: "unknown")
/// - `RUST_LOG`: Tracing filter, added to the default `filestore=info` directives
///
/// # Errors
/// Returns an error if:
/// - the tracing filter directive cannot be parsed,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("filestore=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("api_shared=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("FILESTORE_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());

    let cfg = Arc::new(CoreConfig::from_env_values(
        std::env::var("FILES_STORAGE_PATH").ok(),
        std::env::var("POD_NAME").ok(),
        std::env::var("NODE_NAME").ok(),
    )?);

    tracing::info!("++ Starting file store REST on {}", addr);
    tracing::info!(
        "++ Storage root {} (pod {}, node {})",
        cfg.storage_dir().display(),
        cfg.pod_name(),
        cfg.node_name()
    );

    let app = router(AppState::new(cfg));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
