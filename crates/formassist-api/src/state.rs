//! Application state wiring the orchestrator to its concrete adapters.
//!
//! The orchestrator is generic over backend and sink; `AppState` pins it to
//! the HTTP backend and the filesystem sink.

use std::path::{Path, PathBuf};

use anyhow::Context;

use formassist_core::orchestrator::Orchestrator;
use formassist_infra::config::{
    apply_backend_override, load_client_config, resolve_data_dir, resolve_download_dir,
};
use formassist_infra::http::HttpBackend;
use formassist_infra::sink::FsArtifactSink;
use formassist_types::config::ClientConfig;

/// Orchestrator pinned to the infra implementations.
pub type ConcreteOrchestrator = Orchestrator<HttpBackend, FsArtifactSink>;

/// Resolved configuration for one process.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ClientConfig,
    pub download_dir: PathBuf,
}

impl AppState {
    /// Load config, then apply command-line overrides.
    pub async fn init(
        backend_url: Option<String>,
        download_dir: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_client_config(&data_dir)
            .await
            .context("failed to load configuration")?;
        let config = apply_backend_override(config, backend_url);
        let download_dir = resolve_download_dir(&config, download_dir);

        tracing::debug!(
            data_dir = %data_dir.display(),
            backend_url = %config.backend_url,
            download_dir = %download_dir.display(),
            "configuration resolved"
        );

        Ok(Self {
            config,
            download_dir,
        })
    }

    /// Start a new session against the configured backend.
    ///
    /// Every call creates a fresh session id; sessions are per process.
    pub fn orchestrator(&self, with_greeting: bool) -> anyhow::Result<ConcreteOrchestrator> {
        let backend = HttpBackend::new(&self.config.backend_url)
            .with_context(|| format!("invalid backend URL {}", self.config.backend_url))?;
        let sink = FsArtifactSink::new(&self.download_dir);
        let greeting = with_greeting.then(|| self.config.greeting()).flatten();
        Ok(Orchestrator::with_greeting(backend, sink, greeting))
    }
}
