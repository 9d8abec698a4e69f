use crate::config::ServiceConfig;
use crate::error::ApiResult;
use crate::store::{self, ImageStore};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Service configuration
    pub config: Arc<ServiceConfig>,

    /// Document store backing the image collection
    pub store: Arc<dyn ImageStore>,
}

impl AppState {
    /// Connect the configured store backend and assemble shared state
    pub async fn new(config: ServiceConfig) -> ApiResult<Self> {
        let store = store::connect(&config.store).await?;
        Ok(Self {
            config: Arc::new(config),
            store,
        })
    }
}
