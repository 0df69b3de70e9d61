use crate::chunks::{ChunkStorage, ChunkTracker, LocalChunkStorage};
use crate::config::Config;
use crate::session::SessionLifecycle;
use crate::store::EntityStore;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Users, patients, templates and sessions
    pub store: Arc<EntityStore>,

    /// Per-session chunk records
    pub chunks: Arc<ChunkTracker>,

    /// Destination for raw chunk uploads
    pub storage: Arc<dyn ChunkStorage>,

    /// Session state transitions and deferred completion
    pub lifecycle: Arc<SessionLifecycle>,

    /// Base of the presigned upload URLs handed to clients
    pub public_base_url: String,
}

impl AppState {
    pub fn new(
        store: Arc<EntityStore>,
        storage: Arc<dyn ChunkStorage>,
        completion_delay: Duration,
        public_base_url: impl Into<String>,
    ) -> Self {
        let lifecycle = Arc::new(SessionLifecycle::new(Arc::clone(&store), completion_delay));
        Self {
            store,
            chunks: Arc::new(ChunkTracker::new()),
            storage,
            lifecycle,
            public_base_url: public_base_url.into(),
        }
    }

    /// Seeded store plus local chunk storage, as configured
    pub async fn from_config(cfg: &Config) -> Result<Self> {
        let storage = LocalChunkStorage::create(&cfg.storage.uploads_path).await?;
        Ok(Self::new(
            Arc::new(EntityStore::seeded()),
            Arc::new(storage),
            cfg.completion_delay(),
            cfg.public_base_url(),
        ))
    }

    /// Abort deferred work before the process exits
    pub async fn shutdown(&self) {
        self.lifecycle.shutdown().await;
    }
}
