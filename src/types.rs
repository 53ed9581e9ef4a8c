//! Core types for page-dl

use std::path::PathBuf;
use std::time::Duration;

use crate::error::CleanupError;
use crate::identifier::DocumentId;

/// One run of the tool: which document, how many pages, what to do afterwards
#[derive(Clone, Debug)]
pub struct DownloadRequest {
    /// Validated document identifier
    pub id: DocumentId,
    /// Number of pages to fetch (indices `0..pages`)
    pub pages: u32,
    /// Merge the downloaded pages into one document
    pub generate_document: bool,
    /// Delete the page files after a successful merge
    pub remove_sources: bool,
}

impl DownloadRequest {
    /// Download-only request
    pub fn new(id: DocumentId, pages: u32) -> Self {
        Self {
            id,
            pages,
            generate_document: false,
            remove_sources: false,
        }
    }

    /// Also assemble a document after downloading
    pub fn generate_document(mut self, enabled: bool) -> Self {
        self.generate_document = enabled;
        self
    }

    /// Also delete the page files after assembly
    pub fn remove_sources(mut self, enabled: bool) -> Self {
        self.remove_sources = enabled;
        self
    }
}

/// Lifecycle of a run
///
/// `Idle → Validated → Downloading → Downloaded → Assembling → Assembled →
/// CleaningUp → Done`, with `Aborted` reachable only before any side effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Nothing checked yet
    Idle,
    /// Identifier and configuration accepted
    Validated,
    /// Page fetches in flight
    Downloading,
    /// Every page fetch has finished, successfully or not
    Downloaded,
    /// Merging pages into the document
    Assembling,
    /// Document written
    Assembled,
    /// Removing page files
    CleaningUp,
    /// Run finished
    Done,
    /// Rejected before any side effect
    Aborted,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Validated => "validated",
            RunState::Downloading => "downloading",
            RunState::Downloaded => "downloaded",
            RunState::Assembling => "assembling",
            RunState::Assembled => "assembled",
            RunState::CleaningUp => "cleaning_up",
            RunState::Done => "done",
            RunState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Progress events emitted during a run
#[derive(Clone, Debug)]
pub enum Event {
    /// Page fetches are about to be dispatched
    DownloadStarted {
        /// Document being downloaded
        id: DocumentId,
        /// Number of pages requested
        pages: u32,
        /// Concurrent fetch limit
        workers: usize,
    },
    /// One page was written (or already present)
    PageFetched {
        /// Page index
        page: u32,
        /// Bytes written (0 when skipped)
        bytes: u64,
    },
    /// One page could not be fetched
    PageFailed {
        /// Page index
        page: u32,
        /// Failure description
        error: String,
    },
    /// Every page fetch finished
    DownloadComplete {
        /// Pages now on disk
        succeeded: u32,
        /// Pages that failed
        failed: u32,
    },
    /// Document assembly started
    AssemblyStarted {
        /// Number of page files being merged
        pages: usize,
    },
    /// Document written
    Assembled {
        /// Output path
        path: PathBuf,
        /// Pages in the document
        pages: usize,
    },
    /// Page files removed after assembly
    SourcesRemoved {
        /// Files deleted
        removed: usize,
        /// Files that could not be deleted
        failed: usize,
    },
}

/// A page that could not be fetched
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageFailure {
    /// Page index
    pub page: u32,
    /// Failure description
    pub error: String,
}

/// Outcome of the batch download
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    /// Number of pages requested
    pub requested: u32,
    /// Pages on disk after the batch, ascending
    pub succeeded: Vec<u32>,
    /// Pages skipped because they already existed (subset of `succeeded`)
    pub skipped: Vec<u32>,
    /// Pages that failed, ascending by index
    pub failed: Vec<PageFailure>,
    /// Total bytes written
    pub bytes: u64,
    /// Concurrent fetch limit used
    pub workers: usize,
    /// Wall time of the batch
    pub elapsed: Duration,
}

impl BatchReport {
    /// Every requested page is on disk
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.succeeded.len() as u64 == u64::from(self.requested)
    }

    /// Indices that failed, ascending
    pub fn failed_pages(&self) -> Vec<u32> {
        self.failed.iter().map(|f| f.page).collect()
    }
}

/// The assembled document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledDocument {
    /// Output path
    pub path: PathBuf,
    /// Number of pages written
    pub pages: usize,
    /// Page files merged, in document order
    pub sources: Vec<PathBuf>,
}

/// Outcome of removing page files after assembly
#[derive(Clone, Debug, Default)]
pub struct CleanupReport {
    /// Files deleted
    pub removed: Vec<PathBuf>,
    /// Files that could not be deleted
    pub errors: Vec<CleanupError>,
}

/// Everything a finished run produced
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Final state (always [`RunState::Done`] for a returned summary)
    pub state: RunState,
    /// Document directory
    pub directory: PathBuf,
    /// Download results
    pub download: BatchReport,
    /// Assembled document, if requested
    pub document: Option<AssembledDocument>,
    /// Page-file removal results, if requested
    pub cleanup: Option<CleanupReport>,
    /// Wall time of the whole run
    pub elapsed: Duration,
}
