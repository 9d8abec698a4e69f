//! menagerie - REST service for cataloging animal images
//!
//! Accepts a multipart upload (an `image` file plus descriptive text
//! fields), writes the file to local disk, stores the metadata in a
//! document collection, and exposes retrieval and partial update over
//! HTTP. Uploaded files are served back verbatim under `/uploads`.
//!
//! # Endpoints
//!
//! - `POST /api/images` - multipart create; responds 201 with
//!   `{acknowledged, insertedId}`
//! - `GET /api/images` - every record, in store scan order
//! - `GET /api/images/{id}` - one record, 404 when missing
//! - `PUT /api/images/{id}` - merge-set update; responds with
//!   `{matchedCount, modifiedCount}` and no 404 for unknown ids
//! - `GET /uploads/{filename}` - the stored file bytes
//! - `GET /` - service info, `GET /health` / `GET /ready` - probes
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use menagerie::ServiceConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServiceConfig::load()?;
//!     menagerie::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod record;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;
pub mod upload;

pub use config::{ServiceConfig, StoreConfig};
pub use error::{ApiError, ApiResult};
pub use record::{ImagePatch, ImageRecord, ImageResponse, InsertAck, UpdateReport};
pub use server::{build_router, start_server};
pub use state::AppState;
pub use store::ImageStore;
