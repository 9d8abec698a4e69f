//! In-memory store backend

use super::ImageStore;
use crate::error::{ApiError, ApiResult};
use crate::record::{ImagePatch, ImageRecord, UpdateReport};
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::RwLock;

/// Map-backed store for tests and standalone development. List order is
/// the map's iteration order, which is not stable across processes.
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    records: RwLock<HashMap<ObjectId, ImageRecord>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ImageStore for MemoryImageStore {
    async fn insert(&self, mut record: ImageRecord) -> ApiResult<ObjectId> {
        let id = record.id.unwrap_or_else(ObjectId::new);
        record.id = Some(id);
        let mut records = self
            .records
            .write()
            .map_err(|_| ApiError::store("poisoned lock"))?;
        records.insert(id, record);
        Ok(id)
    }

    async fn list(&self) -> ApiResult<Vec<ImageRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| ApiError::store("poisoned lock"))?;
        Ok(records.values().cloned().collect())
    }

    async fn get(&self, id: ObjectId) -> ApiResult<Option<ImageRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| ApiError::store("poisoned lock"))?;
        Ok(records.get(&id).cloned())
    }

    async fn update(&self, id: ObjectId, patch: &ImagePatch) -> ApiResult<UpdateReport> {
        let mut records = self
            .records
            .write()
            .map_err(|_| ApiError::store("poisoned lock"))?;

        let Some(record) = records.get_mut(&id) else {
            return Ok(UpdateReport {
                matched_count: 0,
                modified_count: 0,
            });
        };

        if patch.is_empty() {
            return Ok(UpdateReport {
                matched_count: 1,
                modified_count: 0,
            });
        }

        let before = record.clone();
        patch.apply(record);
        Ok(UpdateReport {
            matched_count: 1,
            modified_count: u64::from(*record != before),
        })
    }

    async fn ping(&self) -> ApiResult<()> {
        Ok(())
    }

    async fn close(&self) {}
}
