// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF page rasterisation via PDFium.
//
// Pages are rendered at `scale` times their native size (72 points per inch),
// one after another, and returned in document order. Rendering is
// all-or-nothing: a single failing page fails the whole document.

use std::path::PathBuf;

use aksar_core::error::{AksarError, Result};
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info, instrument};

/// Default upscaling factor, i.e. 144 dpi.
pub const DEFAULT_RENDER_SCALE: f32 = 2.0;

/// Renders PDF documents to raster pages.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    scale: f32,
    library_dir: Option<PathBuf>,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_SCALE)
    }
}

impl PdfRenderer {
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            library_dir: None,
        }
    }

    /// Bind to the PDFium library in `dir` only, with no system fallback.
    pub fn with_library_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.library_dir = Some(dir.into());
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Bind a fresh PDFium instance: the configured directory if set, otherwise
    /// the working directory and then the system library.
    fn bind(&self) -> Result<Pdfium> {
        let bindings = match &self.library_dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)),
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|err| AksarError::PdfRendererUnavailable(err.to_string()))?;
        Ok(Pdfium::new(bindings))
    }

    /// Render every page of the PDF held in `bytes`.
    ///
    /// A document with zero pages yields an empty vector.
    #[instrument(skip_all, fields(bytes = bytes.len(), scale = self.scale))]
    pub fn render_pages(&self, bytes: &[u8]) -> Result<Vec<DynamicImage>> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|err| AksarError::DecodeError(format!("invalid PDF: {err}")))?;

        let pages = document.pages();
        let mut images = Vec::with_capacity(pages.len() as usize);

        for (index, page) in pages.iter().enumerate() {
            let width = ((page.width().value * self.scale).round() as i32).max(1);
            let height = ((page.height().value * self.scale).round() as i32).max(1);

            let config = PdfRenderConfig::new()
                .set_target_width(width)
                .set_target_height(height);

            let bitmap = page.render_with_config(&config).map_err(|err| {
                AksarError::DecodeError(format!("failed to render page {}: {err}", index + 1))
            })?;

            debug!(page = index + 1, width, height, "Rendered PDF page");
            images.push(DynamicImage::ImageRgb8(bitmap.as_image().into_rgb8()));
        }

        info!(page_count = images.len(), "PDF rasterised");
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scale_is_double() {
        assert_eq!(PdfRenderer::default().scale(), 2.0);
    }

    #[test]
    fn missing_library_is_renderer_unavailable() {
        let renderer = PdfRenderer::default().with_library_dir("/nonexistent/aksar-test/pdfium");
        assert!(matches!(
            renderer.render_pages(b"%PDF-1.4\n%%EOF\n"),
            Err(AksarError::PdfRendererUnavailable(_))
        ));
    }
}
