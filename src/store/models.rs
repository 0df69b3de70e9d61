use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Session status while audio chunks are still arriving
pub const STATUS_RECORDING: &str = "recording";
/// Session status between the final chunk notification and mock completion
pub const STATUS_PROCESSING: &str = "processing";
pub const STATUS_COMPLETED: &str = "completed";

pub const TRANSCRIPT_PENDING: &str = "pending";
pub const TRANSCRIPT_COMPLETED: &str = "completed";

/// A clinician account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// A patient record owned by a clinician
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub pronouns: Option<String>,
    pub email: Option<String>,
    pub background: Option<String>,
    pub medical_history: Option<String>,
    pub family_history: Option<String>,
    pub social_history: Option<String>,
    pub previous_treatment: Option<String>,
}

impl Patient {
    /// A freshly added patient with no clinical attributes yet
    pub fn new(id: String, name: String, user_id: String) -> Self {
        Self {
            id,
            name,
            user_id,
            pronouns: None,
            email: None,
            background: None,
            medical_history: None,
            family_history: None,
            social_history: None,
            previous_treatment: None,
        }
    }
}

/// A note template available to a clinician
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// One clinical recording/transcription episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub patient_id: String,
    pub patient_name: Option<String>,
    pub session_title: Option<String>,
    pub session_summary: Option<String>,
    pub transcript_status: Option<String>,
    pub transcript: Option<String>,
    pub status: String,
    pub date: String,
    pub start_time: String,
    /// Stays `None` until the session leaves `recording`
    pub end_time: Option<String>,
    pub duration: Option<String>,
    pub template_id: Option<String>,
    pub clinical_notes: Vec<Value>,
}

/// A session shared between the store and any deferred effect that holds it
pub type SharedSession = Arc<RwLock<Session>>;

// ============================================================================
// Projections
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub date: String,
    pub session_title: Option<String>,
    pub session_summary: Option<String>,
    pub start_time: String,
}

impl From<&Session> for SessionSummary {
    fn from(s: &Session) -> Self {
        Self {
            id: s.id.clone(),
            date: s.date.clone(),
            session_title: s.session_title.clone(),
            session_summary: s.session_summary.clone(),
            start_time: s.start_time.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Entry of the `patientMap` returned alongside enriched sessions
#[derive(Debug, Clone, Serialize)]
pub struct PatientBrief {
    pub name: String,
    pub pronouns: Option<String>,
}

/// Collection sizes reported by the debug endpoint
#[derive(Debug, Clone, Serialize)]
pub struct EntityCounts {
    pub users: usize,
    pub patients: usize,
    pub sessions: usize,
    pub templates: usize,
    #[serde(rename = "audioChunks")]
    pub audio_chunks: usize,
}
