// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the presentation layer.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Page failures keep the page number and failing stage in the heading.

use crate::error::AksarError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing went wrong, there is just nothing to show.
    Info,
    /// Trying again may work.
    Transient,
    /// User must do something (pick another file, install a language pack).
    ActionRequired,
    /// Cannot be fixed by retrying.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether repeating the same request may succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert an `AksarError` into a `HumanError`.
pub fn humanize_error(err: &AksarError) -> HumanError {
    match err {
        AksarError::Page { page, stage, source } => {
            let inner = humanize_error(source);
            HumanError {
                message: format!("Page {page}: {stage} failed. {}", inner.message),
                ..inner
            }
        }

        AksarError::Superseded { page } => HumanError {
            message: format!("Stopped working on page {page}."),
            suggestion: "A newer request replaced it.".into(),
            retriable: false,
            severity: Severity::Info,
        },

        // -- Document errors --
        AksarError::UnsupportedFormat(detail) => HumanError {
            message: "This type of file isn't supported.".into(),
            suggestion: format!(
                "Choose a JPEG, PNG, BMP or PDF file instead. (File: {detail})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        AksarError::DecodeError(_) => HumanError {
            message: "This file couldn't be read.".into(),
            suggestion: "Check the path. The file may be missing or damaged; try opening it in another program, or scan it again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        AksarError::EmptyDocument => HumanError {
            message: "This document has no pages.".into(),
            suggestion: "There is nothing to show. Try a different file.".into(),
            retriable: false,
            severity: Severity::Info,
        },

        AksarError::PdfRendererUnavailable(_) => HumanError {
            message: "PDF support isn't set up.".into(),
            suggestion: "Install the PDFium library, or set pdf.pdfium_library_dir in the config file.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Pipeline errors --
        AksarError::OcrError(detail) => humanize_ocr_error(detail),

        AksarError::TranslationUnavailable(_) => HumanError {
            message: "The translation service didn't answer.".into(),
            suggestion: "Check your internet connection, then try the page again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Configuration / plumbing --
        AksarError::Config(detail) => HumanError {
            message: "The settings couldn't be used.".into(),
            suggestion: format!("Fix the config file and start again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        AksarError::Internal(_) | AksarError::Serialization(_) => HumanError {
            message: "Something went wrong inside the app.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        AksarError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "The app doesn't have permission to read that file.".into(),
                suggestion: "Check the file permissions, or copy the file somewhere else first.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading a file.".into(),
                suggestion: "Try again.".into(),
                retriable: true,
                severity: Severity::Transient,
            },
        },
    }
}

/// Parse OCR engine details into human-readable messages.
fn humanize_ocr_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("failed loading language") || lower.contains("unsupported language") {
        HumanError {
            message: "The text recognition language pack is missing.".into(),
            suggestion: "Install the Tesseract language data for Khmer (khm) and English (eng), or pick another language mode.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("failed to run") || lower.contains("not found") {
        HumanError {
            message: "The text recognition engine isn't installed.".into(),
            suggestion: "Install Tesseract, or set ocr.tesseract_binary in the config file.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: "Text recognition didn't work on this page.".into(),
            suggestion: "Try scanning the page again with better lighting and focus.".into(),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}
