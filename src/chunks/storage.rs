use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use strict_path::{PathBoundary, StrictPath};
use tracing::info;

/// Destination for raw chunk bytes
///
/// Implementations:
/// - Local: one file per chunk under an uploads directory
#[async_trait::async_trait]
pub trait ChunkStorage: Send + Sync {
    /// Persist the bytes of one chunk, returning where they were written
    async fn store(&self, session_id: &str, chunk_number: u32, bytes: &[u8]) -> Result<PathBuf>;

    /// Storage name for logging
    fn name(&self) -> &str;
}

/// Marker for paths inside the chunk uploads directory
#[derive(Clone)]
pub struct ChunkUploads;

/// Writes chunks as `<session>_chunk_<n>.wav` files in a single directory
pub struct LocalChunkStorage {
    uploads: PathBoundary<ChunkUploads>,
}

impl LocalChunkStorage {
    /// Use `root` as the uploads directory, creating it if needed
    pub async fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let uploads = PathBoundary::<ChunkUploads>::try_new_create(&root)
            .with_context(|| format!("Failed to create uploads directory: {:?}", root))?;

        info!("Chunk uploads will be written to {:?}", root);

        Ok(Self { uploads })
    }

    pub fn root(&self) -> &Path {
        Path::new(self.uploads.interop_path())
    }

    /// Location of a chunk file; fails if the name would leave the uploads directory
    pub fn chunk_path(
        &self,
        session_id: &str,
        chunk_number: u32,
    ) -> Result<StrictPath<ChunkUploads>> {
        let file_name = format!("{}_chunk_{}.wav", session_id, chunk_number);
        self.uploads
            .strict_join(&file_name)
            .with_context(|| format!("Chunk file escapes uploads directory: {}", file_name))
    }
}

#[async_trait::async_trait]
impl ChunkStorage for LocalChunkStorage {
    async fn store(&self, session_id: &str, chunk_number: u32, bytes: &[u8]) -> Result<PathBuf> {
        let path = PathBuf::from(self.chunk_path(session_id, chunk_number)?.interop_path());
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write chunk file: {:?}", path))?;
        Ok(path)
    }

    fn name(&self) -> &str {
        "local"
    }
}
