// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text recognition backends.
//
// The pipeline only needs "image + language tag + layout hint → text", so each
// engine sits behind the `OcrEngine` trait and the session picks one at start-up.
//
// # Feature Gate
//
// The pure-Rust `NeuralEngine` is only available with the `neural-ocr` feature:
//
// ```toml
// aksar-document = { path = "crates/aksar-document", features = ["neural-ocr"] }
// ```

pub mod tesseract;

#[cfg(feature = "neural-ocr")]
pub mod neural;

use aksar_core::error::Result;
use async_trait::async_trait;
use image::DynamicImage;

pub use tesseract::TesseractEngine;

#[cfg(feature = "neural-ocr")]
pub use neural::{NeuralConfig, NeuralEngine};

/// Page layout hint passed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Treat the page as one uniform block of text. Used for every page run.
    #[default]
    UniformBlock,
}

impl LayoutMode {
    /// Tesseract page segmentation mode for this hint.
    pub fn page_segmentation_mode(&self) -> u8 {
        match self {
            Self::UniformBlock => 6,
        }
    }
}

/// A text recognition backend.
///
/// `language` is a Tesseract-style tag such as `khm`, `eng` or `khm+eng`.
/// Engines that cannot handle a tag fail with `AksarError::OcrError`.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    async fn recognize(
        &self,
        image: &DynamicImage,
        language: &str,
        layout: LayoutMode,
    ) -> Result<String>;
}
