//! HTTP API mocking the clinical note-taking backend
//!
//! Public routes:
//! - GET /health, GET /api/docs
//! - PUT /api/upload-chunk/:sessionId/:chunkNumber - Raw chunk upload target
//! - GET /api/debug/all-data, GET /api/debug/chunks/:sessionId
//!
//! Bearer-token routes:
//! - Patients: list, add, details, user lookup by email
//! - Sessions: by patient, all for a user (enriched), upload-session
//! - Templates: defaults for a user
//! - Chunks: get-presigned-url, notify-chunk-uploaded

mod auth;
mod error;
mod extract;
mod handlers;
mod routes;
mod state;

pub use auth::{authenticate, Caller, DEMO_USER_ID};
pub use error::ErrorResponse;
pub use handlers::ENDPOINTS;
pub use routes::{create_router, MAX_BODY_BYTES};
pub use state::AppState;
