//! Batch download -- fan page fetches out over a bounded set of runtime tasks.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use tokio::sync::broadcast;

use crate::error::{FetchError, Result};
use crate::fetcher::{PageFetchContext, PageOutcome, fetch_page};
use crate::types::{BatchReport, Event};

use super::report::aggregate_results;

/// Result of one dispatched page fetch
pub(crate) type PageResult = std::result::Result<PageOutcome, FetchError>;

/// Parameters for downloading every page of one document
pub struct BatchParams {
    /// Shared fetch context (identifier, template, source, directory)
    pub ctx: Arc<PageFetchContext>,
    /// Number of pages; indices `0..pages` are fetched
    pub pages: u32,
    /// Maximum number of fetches in flight
    pub workers: usize,
    /// Progress event channel
    pub event_tx: broadcast::Sender<Event>,
}

/// Download pages `0..pages` with at most `workers` fetches in flight.
///
/// Ensures the document directory exists first (re-using it if present), then
/// waits for every fetch to finish. A failed page is logged and reported but
/// never stops its siblings; the returned error covers only directory creation.
pub async fn download_pages(params: BatchParams) -> Result<BatchReport> {
    let BatchParams {
        ctx,
        pages,
        workers,
        event_tx,
    } = params;
    let workers = workers.max(1);

    tokio::fs::create_dir_all(&ctx.dir).await?;

    tracing::info!(
        document_id = %ctx.id,
        pages,
        workers,
        dir = ?ctx.dir,
        "downloading pages"
    );
    event_tx
        .send(Event::DownloadStarted {
            id: ctx.id.clone(),
            pages,
            workers,
        })
        .ok();

    let start = Instant::now();

    // Each unit is spawned lazily as buffer_unordered pulls it, so at most
    // `workers` tasks exist at once while still running on separate threads.
    let results: Vec<PageResult> = stream::iter(0..pages)
        .map(|page| {
            let ctx = Arc::clone(&ctx);
            let event_tx = event_tx.clone();

            async move {
                let result = match tokio::spawn(async move { fetch_page(&ctx, page).await }).await
                {
                    Ok(result) => result,
                    Err(e) => Err(FetchError::Aborted {
                        page,
                        reason: e.to_string(),
                    }),
                };
                report_page(&event_tx, &result);
                result
            }
        })
        .buffer_unordered(workers)
        .collect()
        .await;

    let report = aggregate_results(results, pages, workers, start.elapsed());

    if report.failed.is_empty() {
        tracing::info!(
            succeeded = report.succeeded.len(),
            bytes = report.bytes,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "all pages downloaded"
        );
    } else {
        tracing::warn!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            failed_pages = ?report.failed_pages(),
            "page downloads finished with failures"
        );
    }
    event_tx
        .send(Event::DownloadComplete {
            succeeded: report.succeeded.len() as u32,
            failed: report.failed.len() as u32,
        })
        .ok();

    Ok(report)
}

fn report_page(event_tx: &broadcast::Sender<Event>, result: &PageResult) {
    match result {
        Ok(PageOutcome::Fetched { page, bytes, .. }) => {
            tracing::debug!(page, bytes, "page downloaded");
            event_tx
                .send(Event::PageFetched {
                    page: *page,
                    bytes: *bytes,
                })
                .ok();
        }
        Ok(PageOutcome::Skipped { page, .. }) => {
            event_tx
                .send(Event::PageFetched {
                    page: *page,
                    bytes: 0,
                })
                .ok();
        }
        Err(e) => {
            tracing::debug!(page = e.page(), error = %e, "page download failed");
            event_tx
                .send(Event::PageFailed {
                    page: e.page(),
                    error: e.to_string(),
                })
                .ok();
        }
    }
}
