// Integration tests for the session lifecycle
//
// Time is paused so the deferred completion fires as soon as the runtime
// is otherwise idle past the configured delay.

use anyhow::Result;
use medinote_mock::error::Error;
use medinote_mock::session::{NewSession, SessionLifecycle, MOCK_SUMMARY, MOCK_TRANSCRIPT};
use medinote_mock::store::EntityStore;
use std::sync::Arc;
use std::time::Duration;

const DELAY: Duration = Duration::from_millis(2000);

fn lifecycle() -> (Arc<EntityStore>, SessionLifecycle) {
    let store = Arc::new(EntityStore::seeded());
    let lifecycle = SessionLifecycle::new(Arc::clone(&store), DELAY);
    (store, lifecycle)
}

#[tokio::test]
async fn test_create_defaults_to_recording() -> Result<()> {
    let (store, lifecycle) = lifecycle();

    let id = lifecycle
        .create(NewSession::new("patient_123", "user_123", "Alice Johnson"))
        .await?;

    assert!(id.starts_with("session_"));

    let session = store.session(&id).await.expect("session stored");
    assert_eq!(session.status, "recording");
    assert_eq!(session.transcript_status.as_deref(), Some("pending"));
    assert_eq!(session.end_time, None);
    assert_eq!(session.transcript, None);
    assert!(session.clinical_notes.is_empty());
    assert!(!session.start_time.is_empty());
    assert_eq!(session.date.len(), 10);

    Ok(())
}

#[tokio::test]
async fn test_create_keeps_caller_supplied_fields() -> Result<()> {
    let (store, lifecycle) = lifecycle();

    let id = lifecycle
        .create(
            NewSession::new("patient_456", "user_123", "Bob Wilson")
                .with_status("paused")
                .with_start_time("2024-02-01T09:00:00Z")
                .with_template("template_123"),
        )
        .await?;

    let session = store.session(&id).await.expect("session stored");
    assert_eq!(session.status, "paused");
    assert_eq!(session.start_time, "2024-02-01T09:00:00Z");
    assert_eq!(session.template_id.as_deref(), Some("template_123"));

    Ok(())
}

#[tokio::test]
async fn test_create_requires_patient_user_and_name() {
    let (_store, lifecycle) = lifecycle();

    let mut request = NewSession::new("patient_123", "user_123", "");
    let err = lifecycle.create(request.clone()).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    request.patient_name = Some("Alice Johnson".to_string());
    request.user_id = None;
    let err = lifecycle.create(request).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test(start_paused = true)]
async fn test_last_chunk_processes_then_completes() -> Result<()> {
    let (store, lifecycle) = lifecycle();
    let id = lifecycle
        .create(NewSession::new("patient_123", "user_123", "Alice Johnson"))
        .await?;

    assert!(lifecycle.on_chunk_notified(&id, true).await);

    let session = store.session(&id).await.expect("session stored");
    assert_eq!(session.status, "processing");
    assert!(session.end_time.is_some(), "end_time set on leaving recording");
    assert_eq!(session.transcript, None);
    assert_eq!(lifecycle.pending_count(&id).await, 1);

    tokio::time::sleep(DELAY + Duration::from_millis(100)).await;

    let session = store.session(&id).await.expect("session stored");
    assert_eq!(session.status, "completed");
    assert_eq!(session.transcript_status.as_deref(), Some("completed"));
    assert_eq!(session.transcript.as_deref(), Some(MOCK_TRANSCRIPT));
    assert_eq!(session.session_summary.as_deref(), Some(MOCK_SUMMARY));
    assert_eq!(lifecycle.pending_count(&id).await, 0);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_intermediate_chunks_do_not_change_status() -> Result<()> {
    let (store, lifecycle) = lifecycle();
    let id = lifecycle
        .create(NewSession::new("patient_123", "user_123", "Alice Johnson"))
        .await?;

    assert!(!lifecycle.on_chunk_notified(&id, false).await);
    tokio::time::sleep(DELAY * 2).await;

    let session = store.session(&id).await.expect("session stored");
    assert_eq!(session.status, "recording");
    assert_eq!(session.end_time, None);

    Ok(())
}

#[tokio::test]
async fn test_last_chunk_for_unknown_session_is_noop() -> Result<()> {
    let (store, lifecycle) = lifecycle();

    assert!(!lifecycle.on_chunk_notified("session_missing", true).await);
    assert!(store.session("session_missing").await.is_none());
    assert_eq!(lifecycle.pending_count("session_missing").await, 0);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_last_notifications_each_schedule_completion() -> Result<()> {
    let (store, lifecycle) = lifecycle();
    let id = lifecycle
        .create(NewSession::new("patient_123", "user_123", "Alice Johnson"))
        .await?;

    lifecycle.on_chunk_notified(&id, true).await;
    lifecycle.on_chunk_notified(&id, true).await;
    assert_eq!(lifecycle.pending_count(&id).await, 2);

    tokio::time::sleep(DELAY * 2).await;

    let session = store.session(&id).await.expect("session stored");
    assert_eq!(session.status, "completed");
    assert_eq!(session.transcript.as_deref(), Some(MOCK_TRANSCRIPT));
    assert_eq!(lifecycle.pending_count(&id).await, 0);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cancel_pending_leaves_session_processing() -> Result<()> {
    let (store, lifecycle) = lifecycle();
    let id = lifecycle
        .create(NewSession::new("patient_123", "user_123", "Alice Johnson"))
        .await?;

    lifecycle.on_chunk_notified(&id, true).await;
    assert_eq!(lifecycle.cancel_pending(&id).await, 1);

    tokio::time::sleep(DELAY * 2).await;

    let session = store.session(&id).await.expect("session stored");
    assert_eq!(session.status, "processing");
    assert_eq!(session.transcript_status.as_deref(), Some("pending"));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_finished_completions_are_forgotten() -> Result<()> {
    let (_store, lifecycle) = lifecycle();

    let mut ids = Vec::new();
    for name in ["Alice Johnson", "Bob Wilson", "Carol Diaz"] {
        let id = lifecycle
            .create(NewSession::new("patient_123", "user_123", name))
            .await?;
        lifecycle.on_chunk_notified(&id, true).await;
        ids.push(id);
    }
    assert_eq!(lifecycle.pending_sessions().await, 3);

    tokio::time::sleep(DELAY + Duration::from_millis(100)).await;

    assert_eq!(lifecycle.pending_sessions().await, 0);
    for id in &ids {
        assert_eq!(lifecycle.pending_count(id).await, 0);
    }

    // A session finished earlier can be scheduled again
    lifecycle.on_chunk_notified(&ids[0], true).await;
    assert_eq!(lifecycle.pending_sessions().await, 1);
    assert_eq!(lifecycle.pending_count(&ids[0]).await, 1);

    Ok(())
}
