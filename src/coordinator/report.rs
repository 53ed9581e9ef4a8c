//! Batch result aggregation.

use std::time::Duration;

use crate::fetcher::PageOutcome;
use crate::types::{BatchReport, PageFailure};

use super::batch::PageResult;

/// Fold per-page results (in completion order) into an index-ordered report.
pub(crate) fn aggregate_results(
    results: Vec<PageResult>,
    requested: u32,
    workers: usize,
    elapsed: Duration,
) -> BatchReport {
    let mut report = BatchReport {
        requested,
        workers,
        elapsed,
        ..BatchReport::default()
    };

    for result in results {
        match result {
            Ok(PageOutcome::Fetched { page, bytes, .. }) => {
                report.succeeded.push(page);
                report.bytes += bytes;
            }
            Ok(PageOutcome::Skipped { page, .. }) => {
                report.succeeded.push(page);
                report.skipped.push(page);
            }
            Err(e) => report.failed.push(PageFailure {
                page: e.page(),
                error: e.to_string(),
            }),
        }
    }

    report.succeeded.sort_unstable();
    report.skipped.sort_unstable();
    report.failed.sort_by_key(|f| f.page);
    report
}
