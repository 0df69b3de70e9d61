use super::auth::Caller;
use super::extract::{
    chunk_number, chunk_number_from_path, flag, session_id_from_path, JsonBody,
};
use super::state::AppState;
use crate::chunks::{SessionChunks, UploadTarget};
use crate::error::{present, Error, Result};
use crate::session::NewSession;
use crate::store::{
    EntityCounts, Patient, PatientBrief, PatientSummary, SessionSummary, TemplateSummary,
};
use axum::{
    body::Bytes,
    extract::{Extension, Path, Query, Request, State},
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Endpoints advertised by the docs route
pub const ENDPOINTS: &[&str] = &[
    "GET /health",
    "GET /api/v1/patients",
    "POST /api/v1/add-patient-ext",
    "GET /api/v1/patient-details/:patientId",
    "GET /api/v1/fetch-session-by-patient/:patientId",
    "GET /api/v1/all-session",
    "GET /api/v1/fetch-default-template-ext",
    "POST /api/v1/upload-session",
    "POST /api/v1/get-presigned-url",
    "PUT /api/upload-chunk/:sessionId/:chunkNumber",
    "POST /api/v1/notify-chunk-uploaded",
    "GET /api/debug/all-data",
    "GET /api/debug/chunks/:sessionId",
];

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPatientRequest {
    pub name: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignRequest {
    pub session_id: Option<String>,
    /// Number or numeric string
    #[serde(default)]
    pub chunk_number: Value,
    pub mime_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyChunkRequest {
    pub session_id: Option<String>,
    /// Number or numeric string
    #[serde(default)]
    pub chunk_number: Value,
    /// Any JSON value; only truthy values mark the final chunk
    #[serde(default)]
    pub is_last: Value,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct DocsResponse {
    pub title: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PatientsResponse {
    pub patients: Vec<PatientSummary>,
}

#[derive(Debug, Serialize)]
pub struct PatientResponse {
    pub patient: Patient,
}

#[derive(Debug, Serialize)]
pub struct UserIdResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct PatientSessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize)]
pub struct AllSessionsResponse {
    pub sessions: Vec<Value>,
    #[serde(rename = "patientMap")]
    pub patient_map: BTreeMap<String, PatientBrief>,
}

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub success: bool,
    pub data: Vec<TemplateSummary>,
}

#[derive(Debug, Serialize)]
pub struct CreatedSessionResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: String,
    pub details: String,
    #[serde(rename = "availableEndpoints")]
    pub available_endpoints: String,
}

fn required_user_id(query: UserQuery) -> Result<String> {
    present(query.user_id).ok_or_else(|| Error::validation("userId parameter required"))
}

/// Session id and chunk number shared by the chunk endpoints
fn chunk_key(session_id: Option<String>, chunk: &Value) -> Result<(String, u32)> {
    let missing = || Error::validation("sessionId and chunkNumber required");
    let session_id = present(session_id).ok_or_else(missing)?;
    let chunk_number = chunk_number(chunk).ok_or_else(missing)??;
    Ok((session_id, chunk_number))
}

// ============================================================================
// System
// ============================================================================

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/docs
pub async fn api_docs() -> Json<DocsResponse> {
    Json(DocsResponse {
        title: "MediNote Mock API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

/// Turn 405 responses into the structured not-found body
///
/// A known path requested with an unsupported method counts as unmatched.
pub async fn method_not_allowed_as_not_found(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return not_found(method, uri).await.into_response();
    }
    response
}

/// Fallback for unmatched routes
pub async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    debug!("No route for {} {}", method, uri);
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Not found".to_string(),
            details: format!("Endpoint {} {} not found", method, uri),
            available_endpoints: "/api/docs".to_string(),
        }),
    )
}

// ============================================================================
// Users & Patients
// ============================================================================

/// GET /api/v1/patients?userId=
pub async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<PatientsResponse>> {
    let user_id = required_user_id(query)?;
    let patients = state.store.patients_for_user(&user_id).await;
    Ok(Json(PatientsResponse { patients }))
}

/// GET /api/users/asd3fd2faec?email=
pub async fn find_user_by_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<UserIdResponse>> {
    let email = present(query.email).ok_or_else(|| Error::validation("email parameter required"))?;
    let user = state
        .store
        .find_user_by_email(&email)
        .await
        .ok_or_else(|| Error::not_found("User not found"))?;
    Ok(Json(UserIdResponse { id: user.id }))
}

/// POST /api/v1/add-patient-ext
pub async fn add_patient(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    JsonBody(req): JsonBody<AddPatientRequest>,
) -> Result<impl IntoResponse> {
    let (name, user_id) = match (present(req.name), present(req.user_id)) {
        (Some(name), Some(user_id)) => (name, user_id),
        _ => return Err(Error::validation("name and userId are required")),
    };

    let patient = state.store.add_patient(name, user_id).await;
    info!("Caller {} added patient {}", caller.user_id, patient.id);

    Ok((StatusCode::CREATED, Json(PatientResponse { patient })))
}

/// GET /api/v1/patient-details/:patient_id
pub async fn patient_details(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<Patient>> {
    state
        .store
        .find_patient(&patient_id)
        .await
        .map(Json)
        .ok_or_else(|| Error::not_found("Patient not found"))
}

// ============================================================================
// Sessions
// ============================================================================

/// GET /api/v1/fetch-session-by-patient/:patient_id
pub async fn sessions_by_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Json<PatientSessionsResponse> {
    let sessions = state.store.sessions_for_patient(&patient_id).await;
    Json(PatientSessionsResponse { sessions })
}

/// GET /api/v1/all-session?userId=
pub async fn all_sessions(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<AllSessionsResponse>> {
    let user_id = required_user_id(query)?;
    let (sessions, patient_map) = state.store.sessions_for_user_enriched(&user_id).await?;
    Ok(Json(AllSessionsResponse {
        sessions,
        patient_map,
    }))
}

// ============================================================================
// Templates
// ============================================================================

/// GET /api/v1/fetch-default-template-ext?userId=
pub async fn default_templates(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<TemplatesResponse>> {
    let user_id = required_user_id(query)?;
    let data = state.store.templates_for_user(&user_id).await;
    Ok(Json(TemplatesResponse {
        success: true,
        data,
    }))
}

// ============================================================================
// Recording / Upload
// ============================================================================

/// POST /api/v1/upload-session
pub async fn upload_session(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NewSession>,
) -> Result<impl IntoResponse> {
    let id = state.lifecycle.create(req).await?;
    Ok((StatusCode::CREATED, Json(CreatedSessionResponse { id })))
}

/// POST /api/v1/get-presigned-url
/// Issue an upload target and register the chunk
pub async fn presigned_url(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<PresignRequest>,
) -> Result<Json<UploadTarget>> {
    let (session_id, chunk_number) = chunk_key(req.session_id, &req.chunk_number)?;

    let target = UploadTarget::presigned(&state.public_base_url, &session_id, chunk_number);
    state
        .chunks
        .register(&session_id, chunk_number, present(req.mime_type))
        .await;

    Ok(Json(target))
}

/// PUT /api/upload-chunk/:session_id/:chunk_number
/// Store raw chunk bytes (public, the presigned URL is the credential)
pub async fn upload_chunk(
    State(state): State<AppState>,
    Path((session_id, chunk)): Path<(String, String)>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let session_id = session_id_from_path(&session_id)?;
    let chunk_number = chunk_number_from_path(&chunk)?;

    let path = state
        .storage
        .store(session_id, chunk_number, &body)
        .await
        .map_err(Error::storage)?;

    info!(
        "Stored chunk {} of session {} ({} bytes, {} storage)",
        chunk_number,
        session_id,
        body.len(),
        state.storage.name()
    );

    state
        .chunks
        .mark_uploaded(session_id, chunk_number, path)
        .await;

    Ok(StatusCode::OK)
}

/// POST /api/v1/notify-chunk-uploaded
pub async fn notify_chunk_uploaded(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NotifyChunkRequest>,
) -> Result<Json<Value>> {
    let (session_id, chunk_number) = chunk_key(req.session_id, &req.chunk_number)?;

    state.chunks.mark_notified(&session_id, chunk_number).await;
    state
        .lifecycle
        .on_chunk_notified(&session_id, flag(&req.is_last))
        .await;

    Ok(Json(Value::Object(Default::default())))
}

// ============================================================================
// Debug
// ============================================================================

/// GET /api/debug/all-data
pub async fn debug_all_data(State(state): State<AppState>) -> Json<EntityCounts> {
    let audio_chunks = state.chunks.session_count().await;
    Json(state.store.counts(audio_chunks).await)
}

/// GET /api/debug/chunks/:session_id
pub async fn debug_chunks(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<SessionChunks> {
    Json(state.chunks.session_chunks(&session_id).await)
}
