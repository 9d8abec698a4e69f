//! API route handlers
//!
//! - `images`: the four record operations (create, list, get, update)
//! - `health`: liveness and readiness probes

pub mod health;
pub mod images;

use crate::error::{ApiError, ApiResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Service name, version and endpoint map, served at the root path
pub async fn api_info() -> ApiResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "menagerie",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "POST /api/images",
            "GET /api/images",
            "GET /api/images/{id}",
            "PUT /api/images/{id}",
            "GET /uploads/{filename}",
            "GET /health",
            "GET /ready"
        ]
    })))
}

/// Fallback for undefined routes
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}
