//! Document store abstraction
//!
//! Handlers talk to an [`ImageStore`] trait object, never to a driver
//! type. Two backends exist: `mongodb` for deployments and `memory` for
//! tests and standalone development, selected by [`StoreConfig`].

use crate::config::StoreConfig;
use crate::error::{ApiError, ApiResult};
use crate::record::{ImagePatch, ImageRecord, UpdateReport};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

mod memory;
mod mongo;

pub use memory::MemoryImageStore;
pub use mongo::MongoImageStore;

/// Backend-neutral persistence for image records
#[async_trait::async_trait]
pub trait ImageStore: Send + Sync {
    /// Insert a record, returning the id the store generated for it
    async fn insert(&self, record: ImageRecord) -> ApiResult<ObjectId>;

    /// Every record in the collection, in backend scan order
    async fn list(&self) -> ApiResult<Vec<ImageRecord>>;

    /// Single record by id
    async fn get(&self, id: ObjectId) -> ApiResult<Option<ImageRecord>>;

    /// Merge-set the fields present in `patch` into the matching record.
    /// An id that matches nothing reports zero counts; it is not an error.
    async fn update(&self, id: ObjectId, patch: &ImagePatch) -> ApiResult<UpdateReport>;

    /// Cheap reachability probe for readiness reporting
    async fn ping(&self) -> ApiResult<()>;

    /// Release backend resources; called once after graceful drain
    async fn close(&self);
}

/// Build the backend named by the configuration
pub async fn connect(config: &StoreConfig) -> ApiResult<Arc<dyn ImageStore>> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryImageStore::new())),
        "mongodb" => Ok(Arc::new(MongoImageStore::connect(config).await?)),
        other => Err(ApiError::Config(format!("unknown store backend `{other}`"))),
    }
}
