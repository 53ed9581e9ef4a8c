//! Identifiers, page bodies and directory helpers

use std::path::Path;

use page_dl::{Config, DocumentId};

/// The reference identifier used throughout the tests
pub const DOC_ID: &str = "c9bf9e57-1685-4c89-bafb-ff5af830be8a";

/// Parsed [`DOC_ID`]
pub fn doc_id() -> DocumentId {
    DocumentId::parse(DOC_ID).unwrap()
}

/// A decodable page image whose width encodes the page index
#[cfg(feature = "document")]
pub fn page_body(page: u32) -> Vec<u8> {
    let mut png = Vec::new();
    image::RgbImage::from_pixel(16 + page, 24, image::Rgb([255, 255, 255]))
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    png
}

/// Opaque page bytes (no image support in this build)
#[cfg(not(feature = "document"))]
pub fn page_body(page: u32) -> Vec<u8> {
    format!("page-{page}").into_bytes()
}

/// Config writing under `base` and fetching from `server_uri`
pub fn test_config(base: &Path, server_uri: &str) -> Config {
    Config {
        base_dir: base.to_path_buf(),
        url_template: page_template(server_uri),
        workers: Some(4),
        ..Default::default()
    }
}

/// URL template pointing at the mock page server
pub fn page_template(server_uri: &str) -> String {
    format!("{server_uri}/resources/{{id}}/pages/page{{page}}")
}

/// Sorted file names in `dir`
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
