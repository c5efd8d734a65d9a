// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// aksar-document: document handling for the Aksar OCR pipeline.
//
// Provides document loading (images and PDFs rasterised through PDFium), the
// Khmer-tuned preprocessing pipeline, text recognition backends (the Tesseract
// CLI, plus `ocrs` behind the `neural-ocr` feature) and cleanup of raw OCR text.

pub mod image;
pub mod loader;
pub mod ocr;
pub mod pdf;
pub mod text;

// Re-export the primary entry points so callers can use `aksar_document::preprocess` etc.
pub use self::image::{ImagePreprocessor, preprocess};
pub use loader::{DocumentLoader, DocumentSource};
pub use ocr::{LayoutMode, OcrEngine, TesseractEngine};
pub use pdf::PdfRenderer;
pub use text::normalize;

#[cfg(feature = "neural-ocr")]
pub use ocr::{NeuralConfig, NeuralEngine};
