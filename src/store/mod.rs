//! In-memory entity store
//!
//! Holds users, patients, templates and sessions for the lifetime of the
//! process. Each collection sits behind its own lock; sessions are stored as
//! shared handles so that deferred lifecycle effects can keep a session alive
//! and mutate it without looking it up again.

mod models;
mod seed;

pub use models::{
    EntityCounts, Patient, PatientBrief, PatientSummary, Session, SessionSummary, SharedSession,
    Template, TemplateSummary, User, STATUS_COMPLETED, STATUS_PROCESSING, STATUS_RECORDING,
    TRANSCRIPT_COMPLETED, TRANSCRIPT_PENDING,
};

use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct EntityStore {
    users: RwLock<Vec<User>>,
    patients: RwLock<Vec<Patient>>,
    templates: RwLock<Vec<Template>>,
    sessions: RwLock<Vec<SharedSession>>,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            patients: RwLock::new(Vec::new()),
            templates: RwLock::new(Vec::new()),
            sessions: RwLock::new(Vec::new()),
        }
    }

    /// Create a store populated with the demo users, patients, templates and session
    pub fn seeded() -> Self {
        Self {
            users: RwLock::new(seed::users()),
            patients: RwLock::new(seed::patients()),
            templates: RwLock::new(seed::templates()),
            sessions: RwLock::new(
                seed::sessions()
                    .into_iter()
                    .map(|s| Arc::new(RwLock::new(s)))
                    .collect(),
            ),
        }
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|u| u.email == email).cloned()
    }

    // ------------------------------------------------------------------------
    // Patients
    // ------------------------------------------------------------------------

    pub async fn patients_for_user(&self, user_id: &str) -> Vec<PatientSummary> {
        let patients = self.patients.read().await;
        patients
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| PatientSummary {
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect()
    }

    pub async fn add_patient(&self, name: String, user_id: String) -> Patient {
        let patient = Patient::new(format!("patient_{}", uuid::Uuid::new_v4()), name, user_id);
        let mut patients = self.patients.write().await;
        patients.push(patient.clone());
        patient
    }

    pub async fn find_patient(&self, patient_id: &str) -> Option<Patient> {
        let patients = self.patients.read().await;
        patients.iter().find(|p| p.id == patient_id).cloned()
    }

    // ------------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------------

    pub async fn templates_for_user(&self, user_id: &str) -> Vec<TemplateSummary> {
        let templates = self.templates.read().await;
        templates
            .iter()
            .filter(|t| t.user_id == user_id)
            .map(|t| TemplateSummary {
                id: t.id.clone(),
                title: t.title.clone(),
                kind: t.kind.clone(),
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------------

    /// Append a session and return the shared handle now owned by the store
    pub async fn insert_session(&self, session: Session) -> SharedSession {
        let shared = Arc::new(RwLock::new(session));
        let mut sessions = self.sessions.write().await;
        sessions.push(Arc::clone(&shared));
        shared
    }

    pub async fn find_session(&self, session_id: &str) -> Option<SharedSession> {
        let sessions = self.sessions.read().await;
        for handle in sessions.iter() {
            if handle.read().await.id == session_id {
                return Some(Arc::clone(handle));
            }
        }
        None
    }

    /// Snapshot of a single session
    pub async fn session(&self, session_id: &str) -> Option<Session> {
        match self.find_session(session_id).await {
            Some(handle) => Some(handle.read().await.clone()),
            None => None,
        }
    }

    async fn session_snapshots(&self) -> Vec<Session> {
        let sessions = self.sessions.read().await;
        let mut snapshots = Vec::with_capacity(sessions.len());
        for handle in sessions.iter() {
            snapshots.push(handle.read().await.clone());
        }
        snapshots
    }

    pub async fn sessions_for_patient(&self, patient_id: &str) -> Vec<SessionSummary> {
        self.session_snapshots()
            .await
            .iter()
            .filter(|s| s.patient_id == patient_id)
            .map(SessionSummary::from)
            .collect()
    }

    /// Sessions of a user, each merged with its patient's attributes, plus a
    /// map of every known patient's name and pronouns
    pub async fn sessions_for_user_enriched(
        &self,
        user_id: &str,
    ) -> Result<(Vec<Value>, BTreeMap<String, PatientBrief>)> {
        let user_sessions: Vec<Session> = self
            .session_snapshots()
            .await
            .into_iter()
            .filter(|s| s.user_id == user_id)
            .collect();

        let patients = self.patients.read().await;

        let patient_map = patients
            .iter()
            .map(|p| {
                (
                    p.id.clone(),
                    PatientBrief {
                        name: p.name.clone(),
                        pronouns: p.pronouns.clone(),
                    },
                )
            })
            .collect();

        let mut enriched = Vec::with_capacity(user_sessions.len());
        for session in &user_sessions {
            let patient = patients.iter().find(|p| p.id == session.patient_id);
            let mut value = serde_json::to_value(session)?;
            if let Value::Object(fields) = &mut value {
                fields.insert(
                    "patient_name".to_string(),
                    Value::String(
                        patient
                            .map(|p| p.name.clone())
                            .unwrap_or_else(|| "Unknown Patient".to_string()),
                    ),
                );
                let attributes = [
                    ("pronouns", patient.and_then(|p| p.pronouns.as_ref())),
                    ("email", patient.and_then(|p| p.email.as_ref())),
                    ("background", patient.and_then(|p| p.background.as_ref())),
                    ("medical_history", patient.and_then(|p| p.medical_history.as_ref())),
                    ("family_history", patient.and_then(|p| p.family_history.as_ref())),
                    ("social_history", patient.and_then(|p| p.social_history.as_ref())),
                    (
                        "previous_treatment",
                        patient.and_then(|p| p.previous_treatment.as_ref()),
                    ),
                    ("patient_pronouns", patient.and_then(|p| p.pronouns.as_ref())),
                ];
                for (key, attribute) in attributes {
                    fields.insert(key.to_string(), attr(attribute));
                }
            }
            enriched.push(value);
        }

        Ok((enriched, patient_map))
    }

    /// Collection sizes; chunk sessions are counted by the caller's tracker
    pub async fn counts(&self, audio_chunks: usize) -> EntityCounts {
        EntityCounts {
            users: self.users.read().await.len(),
            patients: self.patients.read().await.len(),
            sessions: self.sessions.read().await.len(),
            templates: self.templates.read().await.len(),
            audio_chunks,
        }
    }
}

/// Patient attribute as JSON, `null` when absent
fn attr(value: Option<&String>) -> Value {
    value.cloned().map(Value::String).unwrap_or(Value::Null)
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}
