//! Request URL template -- substitutes the document identifier and page index.

use crate::error::{Error, Result};

/// Placeholder replaced by the document identifier
pub const ID_PLACEHOLDER: &str = "{id}";
/// Placeholder replaced by the zero-based page index
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// A validated request template
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    /// Validate a template
    ///
    /// The template must contain both `{id}` and `{page}` and must render to an
    /// absolute `http` or `https` URL.
    pub fn new(template: &str) -> Result<Self> {
        for placeholder in [ID_PLACEHOLDER, PAGE_PLACEHOLDER] {
            if !template.contains(placeholder) {
                return Err(Error::config(
                    "url_template",
                    format!("template must contain {placeholder}"),
                ));
            }
        }

        let candidate = Self {
            template: template.to_string(),
        };
        let probe = candidate.render("00000000-0000-4000-8000-000000000000", 0);
        let url = url::Url::parse(&probe).map_err(|e| {
            Error::config("url_template", format!("template is not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(
                "url_template",
                format!("unsupported URL scheme '{}'", url.scheme()),
            ));
        }

        Ok(candidate)
    }

    /// Build the request target for one page
    pub fn render(&self, id: &str, page: u32) -> String {
        self.template
            .replace(ID_PLACEHOLDER, &urlencoding::encode(id))
            .replace(PAGE_PLACEHOLDER, &page.to_string())
    }

    /// The raw template text
    pub fn as_str(&self) -> &str {
        &self.template
    }
}
