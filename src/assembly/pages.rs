//! Page file discovery -- list, order numerically, check for gaps.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::AssemblyError;

/// A downloaded page file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    /// Page index parsed from the file name
    pub page: u32,
    /// Full path
    pub path: PathBuf,
}

/// Parse `<n>.<ext>` into `n`.
///
/// Only canonical decimal stems count: `07.png`, `+1.png` and `.3.png.part`
/// are not page files.
fn parse_page_index(file_name: &str, extension: &str) -> Option<u32> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if !ext.eq_ignore_ascii_case(extension) {
        return None;
    }
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if stem.len() > 1 && stem.starts_with('0') {
        return None;
    }
    stem.parse().ok()
}

/// List the page files in `dir`, ordered by numeric page index.
///
/// Files that are not `<n>.<extension>` (partial downloads, the assembled
/// document, anything else) are ignored. A missing directory yields
/// [`AssemblyError::NoPages`].
pub async fn collect_page_files(
    dir: &Path,
    extension: &str,
) -> Result<Vec<PageFile>, AssemblyError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AssemblyError::NoPages {
                dir: dir.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(AssemblyError::Unreadable {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    let mut files = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                return Err(AssemblyError::Unreadable {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        let is_file = entry
            .file_type()
            .await
            .map(|ft| ft.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(page) = parse_page_index(name, extension) {
            files.push(PageFile {
                page,
                path: entry.path(),
            });
        }
    }

    files.sort_by_key(|f| f.page);
    Ok(files)
}

/// Keep the files for pages `0..page_count` and check nothing is missing.
///
/// With `allow_missing`, gaps are logged and the available pages are kept.
pub fn select_pages(
    files: Vec<PageFile>,
    page_count: u32,
    allow_missing: bool,
    dir: &Path,
) -> Result<Vec<PageFile>, AssemblyError> {
    let selected: Vec<PageFile> = files.into_iter().filter(|f| f.page < page_count).collect();

    if selected.is_empty() {
        return Err(AssemblyError::NoPages {
            dir: dir.to_path_buf(),
        });
    }

    let present: BTreeSet<u32> = selected.iter().map(|f| f.page).collect();
    let missing: Vec<u32> = (0..page_count).filter(|p| !present.contains(p)).collect();

    if !missing.is_empty() {
        if !allow_missing {
            return Err(AssemblyError::MissingPages {
                dir: dir.to_path_buf(),
                missing,
            });
        }
        tracing::warn!(
            missing = missing.len(),
            missing_pages = ?missing,
            "assembling document with missing pages"
        );
    }

    Ok(selected)
}
