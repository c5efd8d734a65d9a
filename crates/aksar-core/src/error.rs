// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Aksar.

use thiserror::Error;

use crate::types::Stage;

/// Top-level error type for all Aksar operations.
#[derive(Debug, Error)]
pub enum AksarError {
    // -- Document errors --
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("could not decode document: {0}")]
    DecodeError(String),

    #[error("document has no pages")]
    EmptyDocument,

    #[error("PDF renderer unavailable: {0}")]
    PdfRendererUnavailable(String),

    // -- Pipeline errors --
    #[error("OCR failed: {0}")]
    OcrError(String),

    #[error("translation unavailable: {0}")]
    TranslationUnavailable(String),

    /// A page run failed; `page` is 1-based.
    #[error("page {page}: {stage} failed: {source}")]
    Page {
        page: usize,
        stage: Stage,
        #[source]
        source: Box<AksarError>,
    },

    /// A newer navigation request replaced the run for this page (1-based).
    #[error("processing of page {page} was superseded by a newer request")]
    Superseded { page: usize },

    // -- Configuration / plumbing --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AksarError {
    /// Wrap a stage failure with the page it happened on (`index` is 0-based).
    pub fn at_page(self, index: usize, stage: Stage) -> Self {
        Self::Page {
            page: index + 1,
            stage,
            source: Box::new(self),
        }
    }

    /// Strip any `Page` wrapping and return the stage-level cause.
    pub fn root(&self) -> &AksarError {
        match self {
            Self::Page { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AksarError>;
