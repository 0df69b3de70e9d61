//! Session lifecycle management
//!
//! This module provides the `SessionLifecycle` controller that manages:
//! - Session creation from upload-session requests
//! - The synchronous recording → processing transition on the final chunk
//! - The deferred processing → completed mock transcription
//! - Cancellation of still-pending completions

mod lifecycle;
mod new_session;

pub use lifecycle::{SessionLifecycle, MOCK_SUMMARY, MOCK_TRANSCRIPT, NEW_SESSION_TITLE};
pub use new_session::NewSession;
