pub mod error;
pub mod handlers;
pub mod state;

use anyhow::Context;
use axum::Router;
use axum::routing::{get, post};
use crmpull_core::Settings;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use state::AppState;

/// API routes plus static files from `static_dir` for everything else.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.settings.static_dir);

    Router::new()
        .route("/api/fetch-companies", post(handlers::fetch_companies))
        .route("/api/status", get(handlers::status))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let address = settings.bind_address();
    let webhook_configured = settings.webhook_configured();

    if !settings.static_dir.is_dir() {
        warn!(
            "Static directory {} does not exist, GET / will return 404",
            settings.static_dir.display()
        );
    }

    let state = AppState::new(settings).context("failed to build HTTP client")?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("bind {}", address))?;

    info!("Server listening on http://{}", address);
    info!(
        "Default webhook from environment: {}",
        if webhook_configured { "configured" } else { "not configured" }
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("axum serve")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
