//! # page-dl
//!
//! Concurrent page-image downloader for paginated documents.
//!
//! Given a document identifier and a page count, page-dl fetches every page
//! image over a bounded set of concurrent tasks into
//! `<base_dir>/<id>/<page>.png`, then can merge the pages into
//! `<base_dir>/<id>/<id>.pdf` and remove the page files.
//!
//! ## Design Philosophy
//!
//! page-dl is designed to be:
//! - **Best-effort** - A failed page is reported and leaves a gap; it never stops the other pages
//! - **Bounded** - Concurrency is capped, so thousands of pages do not mean thousands of sockets
//! - **Fail-fast where it matters** - Bad identifiers and missing capabilities are rejected before anything is written
//! - **Event-driven** - Consumers subscribe to progress events instead of polling
//!
//! ## Quick Start
//!
//! ```no_run
//! use page_dl::{Config, DocumentId, DownloadRequest, PageDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = PageDownloader::new(Config::default())?;
//!
//!     // Subscribe to events
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let id = DocumentId::parse("c9bf9e57-1685-4c89-bafb-ff5af830be8a")?;
//!     let summary = downloader
//!         .run(DownloadRequest::new(id, 12).generate_document(true))
//!         .await?;
//!     println!("failed pages: {:?}", summary.download.failed_pages());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Page image assembly into one document
pub mod assembly;
/// Command-line arguments
pub mod cli;
/// Configuration types
pub mod config;
/// Bounded concurrent download of a page batch
pub mod coordinator;
/// Run orchestration
pub mod downloader;
/// Error types
pub mod error;
/// Single page retrieval
pub mod fetcher;
/// Document identifier validation
pub mod identifier;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use assembly::{AssemblyCapabilities, DocumentAssembler, NoOpAssembler};
#[cfg(feature = "document")]
pub use assembly::PdfAssembler;
pub use config::Config;
pub use downloader::PageDownloader;
pub use error::{AssemblyError, CleanupError, Error, FetchError, Result, ToExitCode, exit_codes};
pub use fetcher::{HttpPageSource, PageResponse, PageSource, UrlTemplate};
pub use identifier::{DocumentId, is_valid_identifier};
pub use types::{
    AssembledDocument, BatchReport, CleanupReport, DownloadRequest, Event, PageFailure, RunState,
    RunSummary,
};
