pub mod chunks;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod store;

pub use chunks::{ChunkRecord, ChunkStorage, ChunkTracker, LocalChunkStorage, UploadTarget};
pub use config::Config;
pub use error::Error;
pub use http::{create_router, AppState};
pub use session::{NewSession, SessionLifecycle};
pub use store::{EntityStore, Session};
