//! Run orchestration split into focused submodules.
//!
//! The `PageDownloader` struct and its methods are organized by stage:
//! - [`run`] - Pre-flight checks, download, assembly and cleanup for one request

mod run;


use std::path::PathBuf;
use std::sync::Arc;

use crate::assembly::{DocumentAssembler, default_assembler};
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{HttpPageSource, PageSource, UrlTemplate};
use crate::identifier::DocumentId;
use crate::types::Event;

/// Main downloader instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct PageDownloader {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Parsed request URL template
    pub(crate) template: UrlTemplate,
    /// Where page bytes come from (trait object so tests can swap the network out)
    pub(crate) source: Arc<dyn PageSource>,
    /// Document assembler picked for this build
    pub(crate) assembler: Arc<dyn DocumentAssembler>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
}

impl PageDownloader {
    /// Create a new downloader
    ///
    /// Validates the configuration, builds the HTTP page source and picks the
    /// document assembler available in this build.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let template = UrlTemplate::new(&config.url_template)?;
        let source: Arc<dyn PageSource> = Arc::new(HttpPageSource::new(&config)?);
        let assembler = default_assembler();

        // Events are best-effort; a slow subscriber only lags
        let (event_tx, _rx) = tokio::sync::broadcast::channel(config.event_capacity);

        tracing::debug!(
            base_dir = ?config.base_dir,
            template = template.as_str(),
            workers = config.worker_count(),
            assembler = assembler.name(),
            "downloader initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            template,
            source,
            assembler,
            event_tx,
        })
    }

    /// Replace the page source
    pub fn with_source(mut self, source: Arc<dyn PageSource>) -> Self {
        self.source = source;
        self
    }

    /// Replace the document assembler
    pub fn with_assembler(mut self, assembler: Arc<dyn DocumentAssembler>) -> Self {
        self.assembler = assembler;
        self
    }

    /// Subscribe to run events
    ///
    /// Each call returns an independent receiver. Events sent before the call
    /// are not replayed.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Directory holding the pages (and document) of `id`: `<base_dir>/<id>`
    pub fn document_dir(&self, id: &DocumentId) -> PathBuf {
        self.config.base_dir.join(id.as_str())
    }
}
