//! Server assembly and lifecycle
//!
//! Builds the router (API routes, static `/uploads` serving, probes,
//! fallback, middleware stack) and drives startup through graceful
//! shutdown: connect the store, sweep the upload staging area, serve
//! until SIGTERM/Ctrl+C, then close the store.

use crate::config::ServiceConfig;
use crate::middleware::track_requests;
use crate::routes::{api_info, health, images, not_found};
use crate::state::AppState;
use crate::upload;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the router over prepared state
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let api_routes = Router::new()
        .route(
            "/api/images",
            post(images::create_image).get(images::list_images),
        )
        // Uploads carry no size limit
        .layer(DefaultBodyLimit::disable())
        .route(
            "/api/images/{id}",
            get(images::get_image).put(images::update_image),
        );

    let service_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check));

    Router::new()
        .merge(api_routes)
        .merge(service_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .fallback(not_found)
        .layer(cors)
        .layer(from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the menagerie HTTP server
///
/// Blocks until shutdown. Startup order: tracing, store connection with
/// a fail-fast reachability ping, upload directory preparation, bind,
/// serve. The store client is closed after the graceful drain.
pub async fn start_server(config: ServiceConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .json()
        .init();

    // Connect the store and verify it is reachable before serving
    let state = Arc::new(AppState::new(config).await?);
    state.store.ping().await?;

    // Prepare the upload directory and clear abandoned staging files
    tokio::fs::create_dir_all(&state.config.upload_dir).await?;
    let swept = upload::sweep_staging(&state.config.upload_dir).await?;
    if swept > 0 {
        tracing::info!(removed = swept, "cleared abandoned staging files");
    }

    let addr: SocketAddr = state.config.socket_addr()?;
    tracing::info!(
        %addr,
        backend = %state.config.store.backend,
        upload_dir = %state.config.upload_dir.display(),
        "starting menagerie server"
    );

    let app = build_router(state.clone());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.store.close().await;
    tracing::info!("server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
