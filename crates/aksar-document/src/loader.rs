// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Turning a file on disk into an ordered list of raster pages.

use std::path::Path;

use aksar_core::error::{AksarError, Result};
use aksar_core::types::DocumentKind;
use image::DynamicImage;
use tracing::{info, instrument};

use crate::pdf::PdfRenderer;

/// Anything that can produce the pages of a document from a path.
///
/// Implementations are synchronous and may be slow; callers run them on a
/// blocking thread.
pub trait DocumentSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<Vec<DynamicImage>>;
}

/// Loads JPEG, PNG and BMP images as single pages and rasterises PDFs.
#[derive(Debug, Clone, Default)]
pub struct DocumentLoader {
    renderer: PdfRenderer,
}

impl DocumentLoader {
    pub fn new(renderer: PdfRenderer) -> Self {
        Self { renderer }
    }

    /// Decode `path` into pages, in order.
    ///
    /// The format is chosen by extension alone (case-insensitive). A missing or
    /// unreadable file is a `DecodeError`. A PDF with no pages yields an empty
    /// vector.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> Result<Vec<DynamicImage>> {
        let kind = DocumentKind::from_path(path)?;
        let bytes = std::fs::read(path)
            .map_err(|err| AksarError::DecodeError(format!("{}: {err}", path.display())))?;

        let pages = match kind {
            DocumentKind::Image => {
                let image = image::load_from_memory(&bytes).map_err(|err| {
                    AksarError::DecodeError(format!("{}: {err}", path.display()))
                })?;
                vec![image]
            }
            DocumentKind::Pdf => self.renderer.render_pages(&bytes)?,
        };

        info!(?kind, page_count = pages.len(), "Document loaded");
        Ok(pages)
    }
}

impl DocumentSource for DocumentLoader {
    fn load(&self, path: &Path) -> Result<Vec<DynamicImage>> {
        DocumentLoader::load(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn unsupported_extension_is_rejected() {
        let loader = DocumentLoader::default();
        assert!(matches!(
            loader.load(Path::new("notes.docx")),
            Err(AksarError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.png");
        match DocumentLoader::default().load(&path) {
            Err(AksarError::DecodeError(detail)) => assert!(detail.contains("absent.png")),
            other => panic!("expected DecodeError, got {other:?}"),
        }
    }

    #[test]
    fn directory_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folder.pdf");
        std::fs::create_dir(&path).unwrap();
        assert!(matches!(
            DocumentLoader::default().load(&path),
            Err(AksarError::DecodeError(_))
        ));
    }

    #[test]
    fn corrupt_image_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let loader = DocumentLoader::default();
        assert!(matches!(loader.load(&path), Err(AksarError::DecodeError(_))));
    }

    #[test]
    fn image_loads_as_single_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SCAN.PNG");
        RgbImage::from_pixel(12, 7, Rgb([200, 10, 10]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        let pages = DocumentLoader::default().load(&path).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!((pages[0].width(), pages[0].height()), (12, 7));
    }

    #[test]
    fn bmp_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.bmp");
        RgbImage::from_pixel(3, 3, Rgb([0, 0, 0]))
            .save_with_format(&path, image::ImageFormat::Bmp)
            .unwrap();

        let source: &dyn DocumentSource = &DocumentLoader::default();
        assert_eq!(source.load(&path).unwrap().len(), 1);
    }
}
