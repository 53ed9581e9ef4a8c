//! Configuration types for page-dl

use crate::error::{Error, Result};
use crate::fetcher::UrlTemplate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Endpoint the reference deployment serves page images from.
///
/// Credentials are passed as empty placeholders; no authentication is negotiated.
pub const DEFAULT_URL_TEMPLATE: &str = "https://d38l3k3yaet8r2.cloudfront.net/resources/products/epubs/generated/{id}/foxit-assets/pages/page{page}?password=&accessToken=null&formMode=true";

/// Worker count used when the host parallelism cannot be determined
pub const FALLBACK_WORKERS: usize = 4;

/// Main configuration for [`PageDownloader`](crate::PageDownloader)
///
/// Every field has a default, so an empty JSON object is a valid configuration
/// file. Command-line flags override values loaded from a file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one sub-directory per document (default: "Pearson Books")
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Request template with `{id}` and `{page}` placeholders
    #[serde(default = "default_url_template")]
    pub url_template: String,

    /// Extension of downloaded page files (default: "png")
    #[serde(default = "default_page_extension")]
    pub page_extension: String,

    /// Extension of the assembled document (default: "pdf")
    #[serde(default = "default_document_extension")]
    pub document_extension: String,

    /// Number of concurrent fetches (None = host logical core count)
    #[serde(default)]
    pub workers: Option<usize>,

    /// Per-request timeout in seconds (None = wait indefinitely)
    #[serde(default, with = "optional_duration_serde")]
    pub request_timeout: Option<Duration>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Write the response body even when the server answers with a non-2xx status
    ///
    /// Off by default: an error response is reported as a failed page instead of
    /// being saved as a corrupt image.
    #[serde(default)]
    pub accept_error_status: bool,

    /// Skip pages whose file already exists from an earlier run
    #[serde(default)]
    pub skip_existing: bool,

    /// Assemble whatever pages exist instead of failing on gaps
    #[serde(default)]
    pub allow_missing_pages: bool,

    /// Capacity of the event broadcast channel (default: 1024)
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            url_template: default_url_template(),
            page_extension: default_page_extension(),
            document_extension: default_document_extension(),
            workers: None,
            request_timeout: None,
            user_agent: default_user_agent(),
            accept_error_status: false,
            skip_existing: false,
            allow_missing_pages: false,
            event_capacity: default_event_capacity(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Serialization`] if it is not valid JSON for this structure.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Check that the configuration is usable before anything touches the disk
    /// or the network.
    pub fn validate(&self) -> Result<()> {
        UrlTemplate::new(&self.url_template)?;

        if self.page_extension.is_empty() || self.page_extension.contains(['.', '/', '\\']) {
            return Err(Error::config(
                "page_extension",
                format!("invalid page extension '{}'", self.page_extension),
            ));
        }
        if self.document_extension.is_empty()
            || self.document_extension.contains(['.', '/', '\\'])
        {
            return Err(Error::config(
                "document_extension",
                format!("invalid document extension '{}'", self.document_extension),
            ));
        }
        if self.page_extension.eq_ignore_ascii_case(&self.document_extension) {
            return Err(Error::config(
                "document_extension",
                "document extension must differ from the page extension",
            ));
        }
        if self.workers == Some(0) {
            return Err(Error::config("workers", "worker count must be at least 1"));
        }
        if self.event_capacity == 0 {
            return Err(Error::config(
                "event_capacity",
                "event capacity must be at least 1",
            ));
        }
        Ok(())
    }

    /// Number of concurrent fetches to run
    ///
    /// Uses the configured value, else the host's available parallelism, else
    /// [`FALLBACK_WORKERS`].
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(FALLBACK_WORKERS)
            })
            .max(1)
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("Pearson Books")
}

fn default_url_template() -> String {
    DEFAULT_URL_TEMPLATE.to_string()
}

fn default_page_extension() -> String {
    "png".into()
}

fn default_document_extension() -> String {
    "pdf".into()
}

fn default_user_agent() -> String {
    concat!("page-dl/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_event_capacity() -> usize {
    1024
}

// Optional Duration serialization helper (whole seconds)
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
