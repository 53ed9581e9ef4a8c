//! Page fetching -- one request per page, written atomically to disk.
//!
//! Split into focused submodules:
//! - [`template`] - Request URL template and placeholder substitution
//! - [`source`] - Network seam ([`PageSource`]) and its `reqwest` implementation
//! - [`page`] - Single-page fetch with write-then-rename persistence

mod page;
mod source;
mod template;


pub use page::{PageFetchContext, PageOutcome, fetch_page, page_path};
pub use source::{HttpPageSource, PageResponse, PageSource};
pub use template::{ID_PLACEHOLDER, PAGE_PLACEHOLDER, UrlTemplate};
