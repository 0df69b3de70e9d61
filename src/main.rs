use anyhow::{Context, Result};
use clap::Parser;
use medinote_mock::{create_router, AppState, Config};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Mock backend for the clinical note-taking API
#[derive(Debug, Parser)]
#[command(name = "medinote-mock", version)]
struct Cli {
    /// Config file (extension optional); missing files fall back to defaults
    #[arg(long, default_value = "config/medinote-mock")]
    config: String,

    /// Address to bind
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Directory receiving chunk uploads
    #[arg(long)]
    uploads_dir: Option<PathBuf>,

    /// Delay before a processing session completes, in milliseconds
    #[arg(long)]
    completion_delay_ms: Option<u64>,
}

impl Cli {
    fn apply(self, cfg: &mut Config) {
        if let Some(bind) = self.bind {
            cfg.service.http.bind = bind;
        }
        if let Some(port) = self.port {
            cfg.service.http.port = port;
        }
        if let Some(dir) = self.uploads_dir {
            cfg.storage.uploads_path = dir;
        }
        if let Some(delay) = self.completion_delay_ms {
            cfg.lifecycle.completion_delay_ms = delay;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("medinote_mock=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut cfg = Config::load(&cli.config)?;
    cli.apply(&mut cfg);

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(&cfg).await?;
    let app = create_router(state.clone(), &cfg.cors)?;

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);
    info!("Docs: {}/api/docs", cfg.public_base_url());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    state.shutdown().await;
    info!("Shut down");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
