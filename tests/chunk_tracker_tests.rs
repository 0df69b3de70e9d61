// Integration tests for chunk bookkeeping
//
// These tests verify that registration, upload and notification facts
// merge into a single record per chunk regardless of arrival order, and
// that local chunk storage writes files where the tracker says it did.

use anyhow::Result;
use medinote_mock::chunks::{
    ChunkStorage, ChunkTracker, LocalChunkStorage, UploadTarget, DEFAULT_MIME_TYPE,
};
use std::path::PathBuf;
use tempfile::TempDir;

#[tokio::test]
async fn test_register_upload_notify_in_order() -> Result<()> {
    let tracker = ChunkTracker::new();

    tracker
        .register("session_a", 0, Some("audio/webm".to_string()))
        .await;
    tracker
        .mark_uploaded("session_a", 0, PathBuf::from("uploads/session_a_chunk_0.wav"))
        .await;
    let record = tracker.mark_notified("session_a", 0).await;

    assert_eq!(record.uploaded, Some(true));
    assert_eq!(record.notified, Some(true));
    assert_eq!(record.mime_type.as_deref(), Some("audio/webm"));
    assert!(record.timestamp.is_some());

    Ok(())
}

#[tokio::test]
async fn test_registration_after_upload_keeps_uploaded_flag() -> Result<()> {
    let tracker = ChunkTracker::new();

    // Notify, upload, then register: the reverse of the usual order
    tracker.mark_notified("session_b", 3).await;
    tracker
        .mark_uploaded("session_b", 3, PathBuf::from("uploads/session_b_chunk_3.wav"))
        .await;
    let record = tracker
        .register("session_b", 3, Some("audio/wav".to_string()))
        .await;

    assert_eq!(record.uploaded, Some(true), "registration must not reset upload");
    assert_eq!(record.notified, Some(true));
    assert_eq!(record.mime_type.as_deref(), Some("audio/wav"));
    assert_eq!(
        record.filepath,
        Some(PathBuf::from("uploads/session_b_chunk_3.wav"))
    );

    Ok(())
}

#[tokio::test]
async fn test_notify_without_upload_is_accepted() -> Result<()> {
    let tracker = ChunkTracker::new();

    let record = tracker.mark_notified("session_c", 1).await;

    // Client-asserted state is recorded as-is
    assert_eq!(record.notified, Some(true));
    assert_eq!(record.uploaded, None);
    assert_eq!(record.mime_type, None);

    Ok(())
}

#[tokio::test]
async fn test_registration_defaults_mime_type() -> Result<()> {
    let tracker = ChunkTracker::new();

    let record = tracker.register("session_d", 0, None).await;

    assert_eq!(record.uploaded, Some(false));
    assert_eq!(record.mime_type.as_deref(), Some(DEFAULT_MIME_TYPE));

    Ok(())
}

#[tokio::test]
async fn test_chunks_are_grouped_per_session() -> Result<()> {
    let tracker = ChunkTracker::new();

    tracker.register("session_e", 0, None).await;
    tracker.register("session_e", 1, None).await;
    tracker.mark_notified("session_e", 1).await;
    tracker.register("session_f", 0, None).await;

    let chunks = tracker.session_chunks("session_e").await;
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[&1].notified, Some(true));
    assert_eq!(chunks[&0].notified, None);

    assert_eq!(tracker.session_count().await, 2);
    assert!(tracker.session_chunks("unknown").await.is_empty());
    assert!(tracker.get("session_f", 0).await.is_some());
    assert!(tracker.get("session_f", 1).await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_local_storage_writes_chunk_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let uploads = temp_dir.path().join("uploads");

    let storage = LocalChunkStorage::create(&uploads).await?;
    assert!(uploads.is_dir(), "uploads directory should be created");

    let path = storage.store("session_g", 2, b"RIFF....WAVE").await?;

    assert!(path.starts_with(storage.root()));
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("session_g_chunk_2.wav")
    );
    assert_eq!(std::fs::read(&path)?, b"RIFF....WAVE");

    Ok(())
}

#[test]
fn test_presigned_target_layout() {
    let target = UploadTarget::presigned("http://localhost:3001/", "session_h", 4);

    assert_eq!(
        target.url,
        "http://localhost:3001/api/upload-chunk/session_h/4"
    );
    assert_eq!(target.gcs_path, "sessions/session_h/chunk_4.wav");
    assert_eq!(
        target.public_url,
        "http://localhost:3001/api/audio/session_h/chunk_4.wav"
    );
}
