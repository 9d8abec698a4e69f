//! MongoDB store backend

use super::ImageStore;
use crate::config::StoreConfig;
use crate::error::{ApiError, ApiResult};
use crate::record::{ImagePatch, ImageRecord, UpdateReport};
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};

/// One driver client per process, one collection of records
pub struct MongoImageStore {
    client: Client,
    database: Database,
    images: Collection<ImageRecord>,
}

impl MongoImageStore {
    /// Parse the connection string and set up collection handles. The
    /// driver connects lazily; startup reachability is checked by the
    /// caller through [`ImageStore::ping`].
    pub async fn connect(config: &StoreConfig) -> ApiResult<Self> {
        let options = ClientOptions::parse(&config.uri).await?;
        let client = Client::with_options(options)?;
        let database = client.database(&config.database);
        let images = database.collection(&config.collection);
        Ok(Self {
            client,
            database,
            images,
        })
    }
}

#[async_trait::async_trait]
impl ImageStore for MongoImageStore {
    async fn insert(&self, record: ImageRecord) -> ApiResult<ObjectId> {
        let ack = self.images.insert_one(&record, None).await?;
        ack.inserted_id
            .as_object_id()
            .ok_or_else(|| ApiError::store("insert did not yield an object id"))
    }

    async fn list(&self) -> ApiResult<Vec<ImageRecord>> {
        let cursor = self.images.find(None, None).await?;
        let records = cursor.try_collect().await?;
        Ok(records)
    }

    async fn get(&self, id: ObjectId) -> ApiResult<Option<ImageRecord>> {
        let record = self.images.find_one(doc! { "_id": id }, None).await?;
        Ok(record)
    }

    async fn update(&self, id: ObjectId, patch: &ImagePatch) -> ApiResult<UpdateReport> {
        // An empty `$set` is rejected by the server; degrade to an
        // existence probe with zero modifications.
        if patch.is_empty() {
            let matched = self
                .images
                .find_one(doc! { "_id": id }, None)
                .await?
                .is_some();
            return Ok(UpdateReport {
                matched_count: u64::from(matched),
                modified_count: 0,
            });
        }

        let result = self
            .images
            .update_one(
                doc! { "_id": id },
                doc! { "$set": patch.set_document() },
                None,
            )
            .await?;
        Ok(UpdateReport {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn ping(&self) -> ApiResult<()> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
    }
}
