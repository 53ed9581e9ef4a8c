//! One request from pre-flight to cleanup.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::assembly::{collect_page_files, document_path, remove_sources, select_pages};
use crate::coordinator::{BatchParams, download_pages};
use crate::error::{Error, Result};
use crate::fetcher::PageFetchContext;
use crate::types::{AssembledDocument, DownloadRequest, Event, RunState, RunSummary};

use super::PageDownloader;

fn transition(state: &mut RunState, next: RunState) {
    tracing::debug!(from = %state, to = %next, "run state changed");
    *state = next;
}

impl PageDownloader {
    /// Download every page of a document, then optionally assemble and clean up
    ///
    /// Stages run in order: pre-flight checks, page download, document
    /// assembly (if `generate_document`), source removal (if also
    /// `remove_sources`). Individual page failures are reported in the
    /// summary and never fail the run; assembly then fails on the gaps unless
    /// `allow_missing_pages` is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `pages` is zero
    /// - A document is requested but this build cannot assemble one (nothing
    ///   is created or fetched in that case)
    /// - The document directory cannot be created
    /// - Assembly fails (pages already downloaded are kept)
    pub async fn run(&self, request: DownloadRequest) -> Result<RunSummary> {
        let start = Instant::now();
        let mut state = RunState::Idle;

        if let Err(e) = self.preflight(&request) {
            transition(&mut state, RunState::Aborted);
            tracing::error!(document_id = %request.id, error = %e, "run rejected");
            return Err(e);
        }
        transition(&mut state, RunState::Validated);

        let directory = self.document_dir(&request.id);
        let ctx = PageFetchContext::new(
            request.id.clone(),
            self.template.clone(),
            Arc::clone(&self.source),
            directory.clone(),
            self.config.page_extension.clone(),
        )
        .accept_error_status(self.config.accept_error_status)
        .skip_existing(self.config.skip_existing);

        transition(&mut state, RunState::Downloading);
        let download = download_pages(BatchParams {
            ctx: Arc::new(ctx),
            pages: request.pages,
            workers: self.config.worker_count(),
            event_tx: self.event_tx.clone(),
        })
        .await?;
        transition(&mut state, RunState::Downloaded);

        let mut document = None;
        let mut cleanup = None;

        if request.generate_document {
            transition(&mut state, RunState::Assembling);
            let assembled = self.assemble(&request, &directory).await?;
            transition(&mut state, RunState::Assembled);

            if request.remove_sources {
                transition(&mut state, RunState::CleaningUp);
                let report = remove_sources(&assembled.sources).await;
                self.event_tx
                    .send(Event::SourcesRemoved {
                        removed: report.removed.len(),
                        failed: report.errors.len(),
                    })
                    .ok();
                if !report.errors.is_empty() {
                    tracing::warn!(
                        failed = report.errors.len(),
                        "some page files could not be removed"
                    );
                }
                cleanup = Some(report);
            }
            document = Some(assembled);
        } else if request.remove_sources {
            tracing::debug!("source removal ignored: no document was requested");
        }

        transition(&mut state, RunState::Done);
        let elapsed = start.elapsed();
        tracing::info!(
            document_id = %request.id,
            elapsed_ms = elapsed.as_millis() as u64,
            "run finished"
        );

        Ok(RunSummary {
            state,
            directory,
            download,
            document,
            cleanup,
            elapsed,
        })
    }

    /// Checks that must pass before anything touches the disk or the network
    fn preflight(&self, request: &DownloadRequest) -> Result<()> {
        if request.pages == 0 {
            return Err(Error::Argument(
                "the number of pages must be at least 1".into(),
            ));
        }

        if request.generate_document && !self.assembler.capabilities().can_assemble {
            return Err(Error::NotSupported(format!(
                "document assembly is not available (assembler '{}')",
                self.assembler.name()
            )));
        }

        Ok(())
    }

    async fn assemble(
        &self,
        request: &DownloadRequest,
        directory: &Path,
    ) -> Result<AssembledDocument> {
        let files = collect_page_files(directory, &self.config.page_extension).await?;
        let pages = select_pages(
            files,
            request.pages,
            self.config.allow_missing_pages,
            directory,
        )?;
        let output = document_path(
            directory,
            request.id.as_str(),
            &self.config.document_extension,
        );

        tracing::info!(
            pages = pages.len(),
            output = ?output,
            assembler = self.assembler.name(),
            "assembling document"
        );
        self.event_tx
            .send(Event::AssemblyStarted { pages: pages.len() })
            .ok();

        let assembled = match self.assembler.assemble(&pages, &output).await {
            Ok(assembled) => assembled,
            Err(e) => {
                tracing::error!(error = %e, output = ?output, "document assembly failed");
                return Err(e);
            }
        };

        tracing::info!(path = ?assembled.path, pages = assembled.pages, "document written");
        self.event_tx
            .send(Event::Assembled {
                path: assembled.path.clone(),
                pages: assembled.pages,
            })
            .ok();

        Ok(assembled)
    }
}
