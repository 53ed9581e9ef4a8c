//! Command-line arguments for the `page-dl` binary.
//!
//! Parsing is done by `clap`; turning the parsed flags into a
//! [`DownloadRequest`] and a [`Config`] happens here so the rules can be tested
//! without spawning the binary.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::identifier::DocumentId;
use crate::types::DownloadRequest;

/// Download the page images of a document and optionally merge them into a PDF
#[derive(Parser, Debug, Default)]
#[command(name = "page-dl", author, version, about, long_about = None)]
pub struct Args {
    /// The document's identifier (a version 4 UUID)
    #[arg(short, long)]
    pub id: Option<String>,

    /// The number of pages in the document
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: Option<u32>,

    /// Merge the downloaded page images into one document
    #[arg(short, long, visible_alias = "generate-pdf", alias = "generate_pdf")]
    pub generate_document: bool,

    /// Remove the downloaded page images after the document is generated
    #[arg(short, long, visible_alias = "remove-png", alias = "remove_png")]
    pub remove_sources: bool,

    /// Print a line per downloaded page and enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Base directory for downloaded documents [default: "Pearson Books"]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of concurrent page downloads [default: available parallelism]
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Request URL template with `{id}` and `{page}` placeholders
    #[arg(long)]
    pub url_template: Option<String>,
}

impl Args {
    /// Build the request from the parsed flags
    ///
    /// The identifier is checked first; nothing else about the run is looked
    /// at until it is known to be well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `--id` or `--pages` is missing and
    /// [`Error::InvalidIdentifier`] if the identifier is not a version 4 UUID.
    pub fn to_request(&self) -> Result<DownloadRequest> {
        let id = self.id.as_deref().ok_or_else(|| {
            Error::Argument("please provide a value for the document's ID (--id)".into())
        })?;
        let pages = self.pages.ok_or_else(|| {
            Error::Argument("please provide the number of pages in the document (--pages)".into())
        })?;
        let id = DocumentId::parse(id)?;

        Ok(DownloadRequest::new(id, pages)
            .generate_document(self.generate_document)
            .remove_sources(self.remove_sources))
    }

    /// Load the configuration file (if any) and apply flag overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration is invalid.
    pub fn to_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(dir) = &self.output_dir {
            config.base_dir = dir.clone();
        }
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if let Some(template) = &self.url_template {
            config.url_template = template.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    const DOC_ID: &str = "c9bf9e57-1685-4c89-bafb-ff5af830be8a";

    fn parse(args: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("page-dl").chain(args.iter().copied()))
    }

    #[test]
    fn parses_short_flags() {
        let args = parse(&["-i", DOC_ID, "-p", "12", "-g", "-r", "-v"]).unwrap();
        assert_eq!(args.id.as_deref(), Some(DOC_ID));
        assert_eq!(args.pages, Some(12));
        assert!(args.generate_document);
        assert!(args.remove_sources);
        assert!(args.verbose);
    }

    #[test]
    fn accepts_legacy_flag_spellings() {
        for (generate, remove) in [
            ("--generate-pdf", "--remove-png"),
            ("--generate_pdf", "--remove_png"),
            ("--generate-document", "--remove-sources"),
        ] {
            let args = parse(&["--id", DOC_ID, "--pages", "3", generate, remove]).unwrap();
            assert!(args.generate_document, "{generate}");
            assert!(args.remove_sources, "{remove}");
        }
    }

    #[test]
    fn rejects_zero_and_non_numeric_pages() {
        let err = parse(&["-i", DOC_ID, "-p", "0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = parse(&["-i", DOC_ID, "-p", "many"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn missing_id_is_an_argument_error() {
        let args = parse(&["-p", "3"]).unwrap();
        let err = args.to_request().unwrap_err();
        assert!(matches!(err, Error::Argument(ref m) if m.contains("--id")));
    }

    #[test]
    fn missing_pages_is_an_argument_error() {
        let args = parse(&["-i", DOC_ID]).unwrap();
        let err = args.to_request().unwrap_err();
        assert!(matches!(err, Error::Argument(ref m) if m.contains("--pages")));
    }

    #[test]
    fn missing_id_is_reported_before_missing_pages() {
        let err = parse(&[]).unwrap().to_request().unwrap_err();
        assert!(matches!(err, Error::Argument(ref m) if m.contains("--id")));
    }

    #[test]
    fn invalid_identifier_is_rejected() {
        let args = parse(&["-i", "not-a-uuid", "-p", "3"]).unwrap();
        assert!(matches!(
            args.to_request(),
            Err(Error::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn request_carries_flags() {
        let upper = DOC_ID.to_uppercase();
        let args = parse(&["-i", upper.as_str(), "-p", "5", "-g"]).unwrap();
        let request = args.to_request().unwrap();
        assert_eq!(request.pages, 5);
        assert!(request.generate_document);
        assert!(!request.remove_sources);
        assert_eq!(request.id.as_str(), upper);
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "-i",
            DOC_ID,
            "-p",
            "1",
            "-o",
            "out",
            "-w",
            "3",
            "--url-template",
            "http://localhost/{id}/{page}",
        ])
        .unwrap();
        let config = args.to_config().unwrap();
        assert_eq!(config.base_dir, PathBuf::from("out"));
        assert_eq!(config.workers, Some(3));
        assert_eq!(config.url_template, "http://localhost/{id}/{page}");
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page-dl.json");
        std::fs::write(&path, r#"{ "base_dir": "from-file", "workers": 2, "skip_existing": true }"#)
            .unwrap();

        let args = parse(&["-c", path.to_str().unwrap(), "-w", "6"]).unwrap();
        let config = args.to_config().unwrap();

        assert_eq!(config.base_dir, PathBuf::from("from-file"));
        assert_eq!(config.workers, Some(6));
        assert!(config.skip_existing);
    }

    #[test]
    fn zero_workers_flag_is_a_config_error() {
        let args = parse(&["-w", "0"]).unwrap();
        assert!(matches!(args.to_config(), Err(Error::Config { .. })));
    }

    #[test]
    fn bad_template_flag_is_a_config_error() {
        let args = parse(&["--url-template", "http://localhost/no-placeholders"]).unwrap();
        assert!(matches!(args.to_config(), Err(Error::Config { .. })));
    }
}
