//! Traits and types for document assembly

use async_trait::async_trait;
use std::path::Path;

use super::pages::PageFile;
use crate::types::AssembledDocument;

/// Capabilities of an assembler implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyCapabilities {
    /// Can merge page images into one document
    pub can_assemble: bool,
    /// Output format produced, if any (e.g. "pdf")
    pub format: Option<&'static str>,
}

/// Trait for merging downloaded page images into one document
///
/// Implementations either do the work (see `PdfAssembler`) or stand in when the
/// image handling support was compiled out ([`NoOpAssembler`](super::NoOpAssembler)).
#[async_trait]
pub trait DocumentAssembler: Send + Sync {
    /// Merge `pages`, already in document order, into the document at `output`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A page file cannot be read or decoded as an image
    /// - The document cannot be written
    /// - Assembly is not supported by this implementation
    async fn assemble(&self, pages: &[PageFile], output: &Path)
    -> crate::Result<AssembledDocument>;

    /// Query capabilities of this assembler
    fn capabilities(&self) -> AssemblyCapabilities;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
