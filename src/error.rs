//! Error types for page-dl
//!
//! This module provides the error handling for the library and the binary:
//! - A top-level [`Error`] with one variant per failure class (argument, fetch,
//!   assembly, capability, I/O, ...)
//! - Per-stage error types ([`FetchError`], [`AssemblyError`], [`CleanupError`])
//!   carrying the page index or path involved
//! - Exit code mapping for the command-line front end ([`ToExitCode`])

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for page-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes used by the `page-dl` binary
pub mod exit_codes {
    /// Run finished (individual page failures do not change this)
    pub const SUCCESS: u8 = 0;
    /// Missing or invalid argument, invalid identifier, or invalid configuration
    pub const ARGUMENT: u8 = 1;
    /// Document assembly failed (missing, unreadable or undecodable pages)
    pub const ASSEMBLY: u8 = 2;
    /// Document assembly was requested but is not available in this build
    pub const CAPABILITY: u8 = 3;
    /// Any other runtime failure (directory creation, HTTP client setup, ...)
    pub const RUNTIME: u8 = 4;
}

/// Main error type for page-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed command-line input
    #[error("invalid argument: {0}")]
    Argument(String),

    /// The document identifier is not a hyphenated version 4 UUID
    #[error("invalid document identifier '{0}': expected a version 4 UUID such as c9bf9e57-1685-4c89-bafb-ff5af830be8a")]
    InvalidIdentifier(String),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "url_template")
        key: Option<String>,
    },

    /// A single page could not be fetched
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Document assembly failed
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Operation not supported by this build (document assembly compiled out)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client error outside of a page fetch (client construction)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration file could not be parsed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error tied to a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// Failure of one page fetch. Recoverable at the batch level.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    #[error("page {page}: request to {url} failed: {reason}")]
    Request {
        /// Page index
        page: u32,
        /// The rendered request URL
        url: String,
        /// Underlying transport error
        reason: String,
    },

    /// The server answered with a non-success status
    #[error("page {page}: server returned HTTP {status}")]
    Status {
        /// Page index
        page: u32,
        /// HTTP status code
        status: u16,
    },

    /// The body could not be persisted to disk
    #[error("page {page}: failed to write {path}: {reason}")]
    Write {
        /// Page index
        page: u32,
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        reason: String,
    },

    /// The fetch task itself died (panic or runtime shutdown)
    #[error("page {page}: fetch task aborted: {reason}")]
    Aborted {
        /// Page index
        page: u32,
        /// Join error description
        reason: String,
    },
}

impl FetchError {
    /// Page index this failure belongs to
    pub fn page(&self) -> u32 {
        match self {
            FetchError::Request { page, .. }
            | FetchError::Status { page, .. }
            | FetchError::Write { page, .. }
            | FetchError::Aborted { page, .. } => *page,
        }
    }
}

/// Document assembly errors (the missing-asset family)
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// No page files exist for the document
    #[error("no page files found in {dir}")]
    NoPages {
        /// Document directory that was scanned
        dir: PathBuf,
    },

    /// Some expected page files are absent
    #[error("{count} page file(s) missing from {dir} (first missing page: {first})", count = .missing.len(), first = .missing.first().copied().unwrap_or_default())]
    MissingPages {
        /// Document directory that was scanned
        dir: PathBuf,
        /// Missing page indices in ascending order
        missing: Vec<u32>,
    },

    /// A page file exists but could not be read
    #[error("failed to read page file {path}: {reason}")]
    Unreadable {
        /// Page file path
        path: PathBuf,
        /// Underlying I/O error
        reason: String,
    },

    /// A page file is not a decodable image
    #[error("failed to decode page image {path}: {reason}")]
    Decode {
        /// Page file path
        path: PathBuf,
        /// Decoder error
        reason: String,
    },

    /// The assembled document could not be written
    #[error("failed to write document {path}: {reason}")]
    Write {
        /// Output document path
        path: PathBuf,
        /// Writer error
        reason: String,
    },
}

/// Failure to delete one source page after assembly. Reported, never fatal.
#[derive(Debug, Clone, Error)]
#[error("failed to remove {path}: {reason}")]
pub struct CleanupError {
    /// Page file that could not be deleted
    pub path: PathBuf,
    /// Underlying I/O error
    pub reason: String,
}

/// Map errors to process exit codes for the command-line front end
pub trait ToExitCode {
    /// Process exit code for this error
    fn exit_code(&self) -> u8;

    /// Machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToExitCode for Error {
    fn exit_code(&self) -> u8 {
        match self {
            Error::Argument(_)
            | Error::InvalidIdentifier(_)
            | Error::Config { .. }
            | Error::Serialization(_) => exit_codes::ARGUMENT,

            Error::Assembly(_) => exit_codes::ASSEMBLY,

            Error::NotSupported(_) => exit_codes::CAPABILITY,

            Error::Fetch(_) | Error::Io(_) | Error::Network(_) => exit_codes::RUNTIME,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Argument(_) => "invalid_argument",
            Error::InvalidIdentifier(_) => "invalid_identifier",
            Error::Config { .. } => "config_error",
            Error::Serialization(_) => "config_parse_error",
            Error::Fetch(_) => "fetch_error",
            Error::Assembly(AssemblyError::NoPages { .. })
            | Error::Assembly(AssemblyError::MissingPages { .. }) => "missing_asset",
            Error::Assembly(AssemblyError::Unreadable { .. })
            | Error::Assembly(AssemblyError::Decode { .. }) => "unreadable_asset",
            Error::Assembly(AssemblyError::Write { .. }) => "document_write_failed",
            Error::NotSupported(_) => "capability_unavailable",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn io_error() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")
    }

    #[test]
    fn argument_class_errors_exit_with_one() {
        let errors = [
            Error::Argument("--pages is required".into()),
            Error::InvalidIdentifier("not-a-uuid".into()),
            Error::config("workers", "must be positive"),
        ];
        for error in errors {
            assert_eq!(error.exit_code(), exit_codes::ARGUMENT, "{error}");
        }
    }

    #[test]
    fn assembly_failure_is_distinct_from_argument_error() {
        let error = Error::Assembly(AssemblyError::MissingPages {
            dir: PathBuf::from("books/x"),
            missing: vec![3, 7],
        });
        assert_eq!(error.exit_code(), exit_codes::ASSEMBLY);
        assert_ne!(error.exit_code(), exit_codes::ARGUMENT);
        assert_eq!(error.error_code(), "missing_asset");
    }

    #[test]
    fn capability_error_has_its_own_exit_code() {
        let error = Error::NotSupported("document assembly".into());
        assert_eq!(error.exit_code(), exit_codes::CAPABILITY);
        assert_eq!(error.error_code(), "capability_unavailable");
    }

    #[test]
    fn io_error_is_runtime_failure() {
        let error = Error::from(io_error());
        assert_eq!(error.exit_code(), exit_codes::RUNTIME);
        assert_eq!(error.error_code(), "io_error");
    }

    #[test]
    fn missing_pages_message_names_first_missing_page() {
        let error = AssemblyError::MissingPages {
            dir: PathBuf::from("books/x"),
            missing: vec![4, 9],
        };
        let msg = error.to_string();
        assert!(msg.contains("2 page file(s) missing"), "{msg}");
        assert!(msg.contains("first missing page: 4"), "{msg}");
    }

    #[test]
    fn fetch_error_reports_its_page() {
        let errors = [
            FetchError::Status {
                page: 3,
                status: 404,
            },
            FetchError::Request {
                page: 3,
                url: "http://localhost/p3".into(),
                reason: "connection refused".into(),
            },
            FetchError::Write {
                page: 3,
                path: PathBuf::from("3.png"),
                reason: "disk full".into(),
            },
            FetchError::Aborted {
                page: 3,
                reason: "panicked".into(),
            },
        ];
        for error in errors {
            assert_eq!(error.page(), 3);
            assert!(error.to_string().starts_with("page 3:"));
        }
    }

    #[test]
    fn cleanup_error_display_includes_path() {
        let error = CleanupError {
            path: PathBuf::from("books/x/0.png"),
            reason: "permission denied".into(),
        };
        assert_eq!(
            error.to_string(),
            "failed to remove books/x/0.png: permission denied"
        );
    }
}
