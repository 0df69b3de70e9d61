use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub lifecycle: LifecycleConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
    /// Base URL handed out in presigned upload targets (default: http://localhost:{port})
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory receiving raw chunk uploads
    pub uploads_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Delay before a processing session is marked completed
    pub completion_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origin, or "*" for any
    pub allow_origin: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "medinote-mock".to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3001,
            public_base_url: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_path: PathBuf::from("uploads"),
        }
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            completion_delay_ms: 2000,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an optional file, then `MEDINOTE_*` environment variables
    ///
    /// Nested keys use a double underscore, e.g. `MEDINOTE_SERVICE__HTTP__PORT=8080`.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("MEDINOTE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.lifecycle.completion_delay_ms)
    }

    pub fn public_base_url(&self) -> String {
        self.service
            .http
            .public_base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.service.http.port))
    }
}
