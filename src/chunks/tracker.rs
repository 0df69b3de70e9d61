use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::debug;

/// Mime type assumed when registration does not name one
pub const DEFAULT_MIME_TYPE: &str = "audio/wav";

/// What is known about one (session, chunk) pair
///
/// Every field is optional: registration, upload and notification each
/// populate their own fields and may arrive in any order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<PathBuf>,
}

/// Chunk records of one session, keyed by chunk number
pub type SessionChunks = BTreeMap<u32, ChunkRecord>;

/// Records client-asserted chunk state per session
///
/// Nothing here is verified: a chunk may be notified without ever having been
/// uploaded. Records are created lazily and never removed.
pub struct ChunkTracker {
    chunks: RwLock<HashMap<String, SessionChunks>>,
}

impl ChunkTracker {
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(HashMap::new()),
        }
    }

    /// Apply `update` to the record for (session, chunk), creating it if absent
    async fn merge<F>(&self, session_id: &str, chunk_number: u32, update: F) -> ChunkRecord
    where
        F: FnOnce(&mut ChunkRecord),
    {
        let mut chunks = self.chunks.write().await;
        let record = chunks
            .entry(session_id.to_string())
            .or_default()
            .entry(chunk_number)
            .or_default();
        update(record);
        record.clone()
    }

    /// An upload target was issued for this chunk
    ///
    /// Leaves `uploaded` alone when the bytes already arrived.
    pub async fn register(
        &self,
        session_id: &str,
        chunk_number: u32,
        mime_type: Option<String>,
    ) -> ChunkRecord {
        debug!("Registering chunk {} of session {}", chunk_number, session_id);
        self.merge(session_id, chunk_number, |record| {
            record.uploaded.get_or_insert(false);
            record.mime_type = Some(mime_type.unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()));
            record.timestamp = Some(Utc::now());
        })
        .await
    }

    /// The chunk's bytes were stored at `filepath`
    pub async fn mark_uploaded(
        &self,
        session_id: &str,
        chunk_number: u32,
        filepath: PathBuf,
    ) -> ChunkRecord {
        debug!("Chunk {} of session {} uploaded", chunk_number, session_id);
        self.merge(session_id, chunk_number, |record| {
            record.uploaded = Some(true);
            record.filepath = Some(filepath);
        })
        .await
    }

    /// The client reported the chunk as transferred
    pub async fn mark_notified(&self, session_id: &str, chunk_number: u32) -> ChunkRecord {
        debug!("Chunk {} of session {} notified", chunk_number, session_id);
        self.merge(session_id, chunk_number, |record| {
            record.notified = Some(true);
        })
        .await
    }

    pub async fn get(&self, session_id: &str, chunk_number: u32) -> Option<ChunkRecord> {
        let chunks = self.chunks.read().await;
        chunks
            .get(session_id)
            .and_then(|session| session.get(&chunk_number))
            .cloned()
    }

    /// All chunk records of a session (empty if none were ever referenced)
    pub async fn session_chunks(&self, session_id: &str) -> SessionChunks {
        let chunks = self.chunks.read().await;
        chunks.get(session_id).cloned().unwrap_or_default()
    }

    /// Number of sessions with at least one chunk record
    pub async fn session_count(&self) -> usize {
        self.chunks.read().await.len()
    }
}

impl Default for ChunkTracker {
    fn default() -> Self {
        Self::new()
    }
}
