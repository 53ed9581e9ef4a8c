//! PDF assembler: one page per image, image drawn edge to edge.
//!
//! Each page image is decoded, flattened to 8-bit RGB and embedded as a
//! baseline JPEG (`/DCTDecode`) XObject. The page `MediaBox` matches the
//! pixel size of the image at 72 dpi.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use lopdf::{Document, Object, Stream, dictionary};

use super::pages::PageFile;
use super::traits::{AssemblyCapabilities, DocumentAssembler};
use crate::error::AssemblyError;
use crate::types::AssembledDocument;

/// Default JPEG quality for embedded page images
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Assembler producing a PDF document
#[derive(Debug, Clone)]
pub struct PdfAssembler {
    jpeg_quality: u8,
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfAssembler {
    /// Create an assembler with the default JPEG quality
    pub fn new() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set the JPEG quality (clamped to 1..=100)
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

#[async_trait]
impl DocumentAssembler for PdfAssembler {
    async fn assemble(
        &self,
        pages: &[PageFile],
        output: &Path,
    ) -> crate::Result<AssembledDocument> {
        let pages = pages.to_vec();
        let output_path = output.to_path_buf();
        let quality = self.jpeg_quality;

        // Decoding and re-encoding is CPU bound
        let result =
            tokio::task::spawn_blocking(move || write_document(&pages, &output_path, quality))
                .await
                .map_err(|e| AssemblyError::Write {
                    path: output.to_path_buf(),
                    reason: format!("assembly task failed: {e}"),
                })?;

        Ok(result?)
    }

    fn capabilities(&self) -> AssemblyCapabilities {
        AssemblyCapabilities {
            can_assemble: true,
            format: Some("pdf"),
        }
    }

    fn name(&self) -> &'static str {
        "pdf"
    }
}

fn write_document(
    pages: &[PageFile],
    output: &Path,
    quality: u8,
) -> Result<AssembledDocument, AssemblyError> {
    if pages.is_empty() {
        return Err(AssemblyError::NoPages {
            dir: output.parent().map(Path::to_path_buf).unwrap_or_default(),
        });
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(pages.len());

    for page in pages {
        let image = load_page(&page.path)?;
        let (width, height) = image.dimensions();
        let jpeg = encode_jpeg(&image, quality, &page.path)?;

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => Object::Integer(i64::from(width)),
                "Height" => Object::Integer(i64::from(height)),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => Object::Integer(8),
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));

        let content = format!("q\n{width} 0 0 {height} 0 0 cm\n/Im0 Do\nQ\n");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(i64::from(width)),
                Object::Integer(i64::from(height)),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => Object::Reference(image_id),
                },
            },
        });
        kids.push(Object::Reference(page_id));

        tracing::trace!(page = page.page, width, height, "page added to document");
    }

    let count = kids.len();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count as i64),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    save_atomically(&mut doc, output)?;

    Ok(AssembledDocument {
        path: output.to_path_buf(),
        pages: count,
        sources: pages.iter().map(|p| p.path.clone()).collect(),
    })
}

fn load_page(path: &Path) -> Result<RgbImage, AssemblyError> {
    let bytes = std::fs::read(path).map_err(|e| AssemblyError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let image = image::load_from_memory(&bytes).map_err(|e| AssemblyError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(image.to_rgb8())
}

fn encode_jpeg(image: &RgbImage, quality: u8, source: &Path) -> Result<Vec<u8>, AssemblyError> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode_image(image)
        .map_err(|e| AssemblyError::Decode {
            path: source.to_path_buf(),
            reason: format!("re-encoding failed: {e}"),
        })?;
    Ok(jpeg)
}

/// Write next to `output` first, then rename, so a failed run never leaves a
/// truncated document behind.
fn save_atomically(doc: &mut Document, output: &Path) -> Result<(), AssemblyError> {
    let temp = temp_path(output);
    let write_error = |reason: String| AssemblyError::Write {
        path: output.to_path_buf(),
        reason,
    };

    let written = write_to(doc, &temp);

    if let Err(reason) = written {
        let _ = std::fs::remove_file(&temp);
        return Err(write_error(reason));
    }

    std::fs::rename(&temp, output).map_err(|e| {
        let _ = std::fs::remove_file(&temp);
        write_error(e.to_string())
    })
}

fn write_to(doc: &mut Document, path: &Path) -> Result<(), String> {
    let file = std::fs::File::create(path).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);
    doc.save_to(&mut writer).map_err(|e| e.to_string())?;
    writer.flush().map_err(|e| e.to_string())
}

fn temp_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    output.with_file_name(format!(".{name}.part"))
}
