use super::new_session::NewSession;
use crate::error::{present, Error, Result};
use crate::store::{
    EntityStore, Session, SharedSession, STATUS_COMPLETED, STATUS_PROCESSING, STATUS_RECORDING,
    TRANSCRIPT_COMPLETED, TRANSCRIPT_PENDING,
};
use chrono::{SecondsFormat, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tracing::{debug, info};

/// Transcript written by the mock completion
pub const MOCK_TRANSCRIPT: &str = "This is a mock transcript generated for demo purposes.";

/// Summary written by the mock completion
pub const MOCK_SUMMARY: &str = "Mock session summary.";

/// Title given to sessions created through the upload flow
pub const NEW_SESSION_TITLE: &str = "New Recording Session";

/// Drives sessions through recording → processing → completed
///
/// The processing transition happens synchronously when the final chunk is
/// notified. Completion is a deferred task that fires after a fixed delay.
/// Pending completions always fire unless explicitly cancelled through
/// [`SessionLifecycle::cancel_pending`]; nothing in the HTTP surface does so.
pub struct SessionLifecycle {
    store: Arc<EntityStore>,

    /// Delay between processing and completed
    completion_delay: Duration,

    /// Scheduled completion tasks (session_id → tickets); finished tasks remove themselves
    pending: Arc<Mutex<HashMap<String, Vec<PendingCompletion>>>>,

    /// Source of ticket numbers identifying scheduled completions
    next_ticket: AtomicU64,
}

struct PendingCompletion {
    ticket: u64,
    handle: AbortHandle,
}

impl SessionLifecycle {
    pub fn new(store: Arc<EntityStore>, completion_delay: Duration) -> Self {
        Self {
            store,
            completion_delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn completion_delay(&self) -> Duration {
        self.completion_delay
    }

    /// Create a session from `request` and return its id
    pub async fn create(&self, request: NewSession) -> Result<String> {
        let (patient_id, user_id, patient_name) = match (
            present(request.patient_id),
            present(request.user_id),
            present(request.patient_name),
        ) {
            (Some(p), Some(u), Some(n)) => (p, u, n),
            _ => {
                return Err(Error::validation(
                    "patientId, userId, patientName required",
                ))
            }
        };

        let now = Utc::now();
        let session = Session {
            id: format!("session_{}", uuid::Uuid::new_v4()),
            user_id,
            patient_id,
            patient_name: Some(patient_name),
            session_title: Some(NEW_SESSION_TITLE.to_string()),
            session_summary: None,
            transcript_status: Some(TRANSCRIPT_PENDING.to_string()),
            transcript: None,
            status: present(request.status).unwrap_or_else(|| STATUS_RECORDING.to_string()),
            date: now.format("%Y-%m-%d").to_string(),
            start_time: present(request.start_time)
                .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            end_time: None,
            duration: None,
            template_id: request.template_id,
            clinical_notes: Vec::new(),
        };

        let id = session.id.clone();
        info!(
            "Created session {} for patient {} (status: {})",
            id, session.patient_id, session.status
        );
        self.store.insert_session(session).await;

        Ok(id)
    }

    /// React to a chunk notification
    ///
    /// Only a notification flagged as last moves the session to processing and
    /// schedules completion. Unknown sessions are ignored. Returns whether a
    /// transition happened.
    pub async fn on_chunk_notified(&self, session_id: &str, is_last: bool) -> bool {
        if !is_last {
            return false;
        }

        let session = match self.store.find_session(session_id).await {
            Some(session) => session,
            None => {
                debug!("Final chunk notified for unknown session {}", session_id);
                return false;
            }
        };

        {
            let mut s = session.write().await;
            s.status = STATUS_PROCESSING.to_string();
            s.end_time = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        }

        info!("Session {} is processing", session_id);

        self.schedule_completion(session_id, session).await;

        true
    }

    /// Spawn the deferred completion for `session`
    ///
    /// The task holds the session handle itself, not its id.
    async fn schedule_completion(&self, session_id: &str, session: SharedSession) {
        let delay = self.completion_delay;
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let pending = Arc::clone(&self.pending);
        let id = session_id.to_string();

        // Held until the handle is recorded, so the task cannot release its
        // ticket before it exists
        let mut scheduled = self.pending.lock().await;

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            {
                let mut s = session.write().await;
                s.status = STATUS_COMPLETED.to_string();
                s.transcript_status = Some(TRANSCRIPT_COMPLETED.to_string());
                s.transcript = Some(MOCK_TRANSCRIPT.to_string());
                s.session_summary = Some(MOCK_SUMMARY.to_string());

                info!("Session {} completed", s.id);
            }

            release(&pending, &id, ticket).await;
        });

        scheduled
            .entry(session_id.to_string())
            .or_default()
            .push(PendingCompletion {
                ticket,
                handle: task.abort_handle(),
            });
    }

    /// Number of completions scheduled for a session that have not run yet
    pub async fn pending_count(&self, session_id: &str) -> usize {
        let pending = self.pending.lock().await;
        pending.get(session_id).map(Vec::len).unwrap_or(0)
    }

    /// Number of sessions with at least one completion still scheduled
    pub async fn pending_sessions(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Abort every completion still scheduled for a session
    pub async fn cancel_pending(&self, session_id: &str) -> usize {
        let handles = {
            let mut pending = self.pending.lock().await;
            pending.remove(session_id).unwrap_or_default()
        };

        let mut cancelled = 0;
        for entry in handles {
            if !entry.handle.is_finished() {
                entry.handle.abort();
                cancelled += 1;
            }
        }

        if cancelled > 0 {
            info!(
                "Cancelled {} pending completion(s) for session {}",
                cancelled, session_id
            );
        }

        cancelled
    }

    /// Abort all pending completions
    pub async fn shutdown(&self) {
        let mut pending = self.pending.lock().await;
        for (_, handles) in pending.drain() {
            for entry in handles {
                entry.handle.abort();
            }
        }
    }
}

/// Forget a completion that has finished running
async fn release(
    pending: &Mutex<HashMap<String, Vec<PendingCompletion>>>,
    session_id: &str,
    ticket: u64,
) {
    let mut pending = pending.lock().await;
    if let Some(entries) = pending.get_mut(session_id) {
        entries.retain(|entry| entry.ticket != ticket);
        if entries.is_empty() {
            pending.remove(session_id);
        }
    }
}
