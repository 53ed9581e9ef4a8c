//! Source page removal after a document has been written.

use std::path::PathBuf;

use crate::error::CleanupError;
use crate::types::CleanupReport;

/// Delete each page file, continuing past failures.
///
/// Every failure, including a file that is already gone, is logged and
/// collected. Failures never fail the run.
pub async fn remove_sources(files: &[PathBuf]) -> CleanupReport {
    let mut report = CleanupReport::default();

    for path in files {
        match tokio::fs::remove_file(path).await {
            Ok(()) => report.removed.push(path.clone()),
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "failed to remove page file");
                report.errors.push(CleanupError {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        removed = report.removed.len(),
        failed = report.errors.len(),
        "page file cleanup finished"
    );
    report
}
