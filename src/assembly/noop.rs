//! No-op assembler for builds without image support

use super::pages::PageFile;
use super::traits::{AssemblyCapabilities, DocumentAssembler};
use crate::types::AssembledDocument;
use async_trait::async_trait;
use std::path::Path;

/// Assembler used when the `document` feature is disabled
///
/// Every call fails with `Error::NotSupported`, so a run that asks for a
/// document stops before any assembly work instead of silently skipping it.
pub struct NoOpAssembler;

#[async_trait]
impl DocumentAssembler for NoOpAssembler {
    async fn assemble(
        &self,
        _pages: &[PageFile],
        _output: &Path,
    ) -> crate::Result<AssembledDocument> {
        Err(crate::Error::NotSupported(
            "document assembly requires image support. \
             Rebuild page-dl with the `document` feature enabled."
                .into(),
        ))
    }

    fn capabilities(&self) -> AssemblyCapabilities {
        AssemblyCapabilities {
            can_assemble: false,
            format: None,
        }
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
