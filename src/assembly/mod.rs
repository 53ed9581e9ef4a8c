//! Document assembly -- merge downloaded page images into one document.
//!
//! - [`traits`] - [`DocumentAssembler`] seam and [`AssemblyCapabilities`]
//! - [`pages`] - Page file discovery in numeric order and gap checking
//! - `pdf` - PDF output (requires the `document` feature)
//! - [`noop`] - Stand-in when image support is compiled out
//! - [`cleanup`] - Source page removal after assembly

pub mod cleanup;
pub mod noop;
pub mod pages;
#[cfg(feature = "document")]
pub mod pdf;
pub mod traits;


use std::sync::Arc;

pub use cleanup::remove_sources;
pub use noop::NoOpAssembler;
pub use pages::{PageFile, collect_page_files, select_pages};
#[cfg(feature = "document")]
pub use pdf::PdfAssembler;
pub use traits::{AssemblyCapabilities, DocumentAssembler};

/// The assembler this build supports
///
/// [`PdfAssembler`] with the `document` feature, [`NoOpAssembler`] otherwise.
pub fn default_assembler() -> Arc<dyn DocumentAssembler> {
    #[cfg(feature = "document")]
    {
        Arc::new(PdfAssembler::new())
    }
    #[cfg(not(feature = "document"))]
    {
        Arc::new(NoOpAssembler)
    }
}

/// Output path of the assembled document: `<dir>/<id>.<extension>`
pub fn document_path(dir: &std::path::Path, id: &str, extension: &str) -> std::path::PathBuf {
    dir.join(format!("{id}.{extension}"))
}
