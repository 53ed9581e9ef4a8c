//! Single-page fetch -- build the request, retrieve the bytes, persist atomically.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::FetchError;
use crate::identifier::DocumentId;

use super::source::PageSource;
use super::template::UrlTemplate;

/// Shared, read-only state for every page fetch of one document.
pub struct PageFetchContext {
    pub(crate) id: DocumentId,
    pub(crate) template: UrlTemplate,
    pub(crate) source: Arc<dyn PageSource>,
    pub(crate) dir: PathBuf,
    pub(crate) extension: String,
    pub(crate) accept_error_status: bool,
    pub(crate) skip_existing: bool,
}

impl PageFetchContext {
    /// Create a context for fetching pages of `id` into `dir`
    pub fn new(
        id: DocumentId,
        template: UrlTemplate,
        source: Arc<dyn PageSource>,
        dir: PathBuf,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            id,
            template,
            source,
            dir,
            extension: extension.into(),
            accept_error_status: false,
            skip_existing: false,
        }
    }

    /// Keep response bodies even for non-2xx statuses
    pub fn accept_error_status(mut self, accept: bool) -> Self {
        self.accept_error_status = accept;
        self
    }

    /// Leave pages that already exist on disk untouched
    pub fn skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing = skip;
        self
    }

    /// Final path of a page file
    pub fn page_path(&self, page: u32) -> PathBuf {
        page_path(&self.dir, page, &self.extension)
    }
}

/// What a successful page fetch did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was downloaded and written
    Fetched {
        /// Page index
        page: u32,
        /// Bytes written
        bytes: u64,
        /// Final file path
        path: PathBuf,
    },
    /// The page file already existed and `skip_existing` is enabled
    Skipped {
        /// Page index
        page: u32,
        /// Existing file path
        path: PathBuf,
    },
}

impl PageOutcome {
    /// Page index of this outcome
    pub fn page(&self) -> u32 {
        match self {
            PageOutcome::Fetched { page, .. } | PageOutcome::Skipped { page, .. } => *page,
        }
    }
}

/// `<dir>/<page>.<ext>`
pub fn page_path(dir: &Path, page: u32, extension: &str) -> PathBuf {
    dir.join(format!("{page}.{extension}"))
}

/// Hidden sibling the body is written to before the final rename
fn partial_path(dir: &Path, page: u32, extension: &str) -> PathBuf {
    dir.join(format!(".{page}.{extension}.part"))
}

/// Fetch one page and write it to its final path.
///
/// The body goes to a hidden `.part` file first and is renamed into place only
/// once fully written, so a failed call never leaves a file that looks complete.
/// No retry is attempted and the bytes are not inspected.
pub async fn fetch_page(ctx: &PageFetchContext, page: u32) -> Result<PageOutcome, FetchError> {
    let final_path = ctx.page_path(page);

    if ctx.skip_existing && tokio::fs::try_exists(&final_path).await.unwrap_or(false) {
        tracing::debug!(page, path = ?final_path, "page already on disk, skipping");
        return Ok(PageOutcome::Skipped {
            page,
            path: final_path,
        });
    }

    let url = ctx.template.render(ctx.id.as_str(), page);
    let response = ctx.source.fetch(page, &url).await?;

    if !response.is_success() {
        if ctx.accept_error_status {
            tracing::warn!(
                page,
                status = response.status,
                "non-success response written as page file"
            );
        } else {
            return Err(FetchError::Status {
                page,
                status: response.status,
            });
        }
    }

    let partial = partial_path(&ctx.dir, page, &ctx.extension);
    let bytes = response.body.len() as u64;

    if let Err(e) = write_then_rename(&partial, &final_path, &response.body).await {
        if let Err(cleanup_err) = tokio::fs::remove_file(&partial).await
            && cleanup_err.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(page, path = ?partial, error = %cleanup_err, "failed to remove partial page file");
        }
        return Err(FetchError::Write {
            page,
            path: final_path,
            reason: e.to_string(),
        });
    }

    Ok(PageOutcome::Fetched {
        page,
        bytes,
        path: final_path,
    })
}

async fn write_then_rename(partial: &Path, final_path: &Path, body: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(partial, body).await?;
    tokio::fs::rename(partial, final_path).await
}
