use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Process start time for uptime reporting
static SERVICE_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

/// Liveness probe
/// Returns 200 whenever the process is up
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "menagerie",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness probe
/// Pings the document store; 503 while it is unreachable
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "service": "menagerie",
                "uptime_seconds": uptime_seconds(),
                "components": {
                    "api": "ready",
                    "store": "ready",
                }
            })),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "service": "menagerie",
                    "uptime_seconds": uptime_seconds(),
                    "components": {
                        "api": "ready",
                        "store": "unreachable",
                    }
                })),
            )
        }
    }
}

fn uptime_seconds() -> u64 {
    SERVICE_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::store::testing::UnreachableStore;
    use crate::store::{ImageStore, MemoryImageStore};

    fn state_with(store: Arc<dyn ImageStore>) -> Arc<AppState> {
        Arc::new(AppState {
            config: Arc::new(ServiceConfig::default()),
            store,
        })
    }

    #[tokio::test]
    async fn health_check_is_always_ok() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_is_ok_with_a_reachable_store() {
        let state = state_with(Arc::new(MemoryImageStore::new()));
        let response = readiness_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_is_unavailable_while_the_store_is_down() {
        let state = state_with(Arc::new(UnreachableStore));
        let response = readiness_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
