//! Chunked audio upload bookkeeping
//!
//! - `ChunkTracker` merges registration, upload and notification facts per chunk
//! - `ChunkStorage` persists the raw bytes of uploaded chunks
//! - `UploadTarget` is the mocked presigned URL handed to clients

mod storage;
mod tracker;

pub use storage::{ChunkStorage, ChunkUploads, LocalChunkStorage};
pub use tracker::{ChunkRecord, ChunkTracker, SessionChunks, DEFAULT_MIME_TYPE};

use serde::Serialize;

/// Where a client should send one chunk
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub url: String,
    pub gcs_path: String,
    pub public_url: String,
}

impl UploadTarget {
    /// Same-host upload target for a chunk, rooted at `base_url`
    pub fn presigned(base_url: &str, session_id: &str, chunk_number: u32) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            url: format!(
                "{}/api/upload-chunk/{}/{}",
                base_url, session_id, chunk_number
            ),
            gcs_path: format!("sessions/{}/chunk_{}.wav", session_id, chunk_number),
            public_url: format!(
                "{}/api/audio/{}/chunk_{}.wav",
                base_url, session_id, chunk_number
            ),
        }
    }
}
