// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Aksar OCR pipeline.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AksarError;

/// User-selected processing profile: which OCR language pack to run and which
/// direction to translate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageMode {
    #[default]
    Khmer,
    English,
    /// Mixed-script pages recognised in a single OCR pass.
    KhmerAndEnglish,
}

impl LanguageMode {
    /// Tesseract-style language tag for the OCR capability.
    pub fn ocr_tag(&self) -> &'static str {
        match self {
            Self::Khmer => "khm",
            Self::English => "eng",
            Self::KhmerAndEnglish => "khm+eng",
        }
    }

    /// Fixed translation direction for this mode.
    pub fn language_pair(&self) -> LanguagePair {
        match self {
            Self::Khmer | Self::KhmerAndEnglish => LanguagePair {
                source: "km",
                target: "en",
            },
            Self::English => LanguagePair {
                source: "en",
                target: "km",
            },
        }
    }

    /// Whether the Khmer-specific text cleanup applies.
    pub fn involves_khmer(&self) -> bool {
        matches!(self, Self::Khmer | Self::KhmerAndEnglish)
    }

    /// Human label used by the presentation layer.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Khmer => "Khmer",
            Self::English => "English",
            Self::KhmerAndEnglish => "Khmer and English",
        }
    }
}

impl std::fmt::Display for LanguageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.ocr_tag())
    }
}

impl std::str::FromStr for LanguageMode {
    type Err = AksarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "khm" | "khmer" | "km" => Ok(Self::Khmer),
            "eng" | "english" | "en" => Ok(Self::English),
            "khm+eng" | "mixed" | "both" => Ok(Self::KhmerAndEnglish),
            other => Err(AksarError::Config(format!(
                "unknown language mode '{other}' (expected khm, eng or khm+eng)"
            ))),
        }
    }
}

/// Source/target language codes handed to the translation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    pub source: &'static str,
    pub target: &'static str,
}

/// Kinds of input the document loader accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Single raster image (JPEG, PNG, BMP).
    Image,
    /// Multi-page PDF.
    Pdf,
}

impl DocumentKind {
    /// Infer the document kind from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "bmp" => Some(Self::Image),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Infer the document kind from a path, failing with `UnsupportedFormat`.
    pub fn from_path(path: &Path) -> Result<Self, AksarError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| AksarError::UnsupportedFormat(path.display().to_string()))
    }
}

/// One of the four strictly sequential stages of a page run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Preprocess,
    Ocr,
    Normalize,
    Translate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Preprocess => "preprocessing",
            Self::Ocr => "text recognition",
            Self::Normalize => "text cleanup",
            Self::Translate => "translation",
        })
    }
}

/// Which text the presentation layer is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextView {
    #[default]
    Original,
    Translated,
}

impl TextView {
    pub fn toggled(self) -> Self {
        match self {
            Self::Original => Self::Translated,
            Self::Translated => Self::Original,
        }
    }
}

/// Output of one successful page run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// 0-based index of the page this result belongs to.
    pub page_index: usize,
    /// Normalized OCR text.
    pub original: String,
    /// Machine translation of `original`. Always populated.
    pub translated: String,
    pub language_mode: LanguageMode,
    pub produced_at: DateTime<Utc>,
}

impl PageResult {
    pub fn new(
        page_index: usize,
        original: String,
        translated: String,
        language_mode: LanguageMode,
    ) -> Self {
        Self {
            page_index,
            original,
            translated,
            language_mode,
            produced_at: Utc::now(),
        }
    }

    /// Text for the given view.
    pub fn text(&self, view: TextView) -> &str {
        match view {
            TextView::Original => &self.original,
            TextView::Translated => &self.translated,
        }
    }
}

/// Identity of the currently loaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub id: Uuid,
    pub source: PathBuf,
    pub page_count: usize,
}

impl DocumentInfo {
    pub fn new(source: impl Into<PathBuf>, page_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            page_count,
        }
    }
}

/// Classification of errors for retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Safe to retry automatically.
    Transient,
    /// User must pick another file or change a setting.
    UserAction,
    /// Corrupt file or malformed service response.
    Permanent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_translates_into_khmer() {
        let pair = LanguageMode::English.language_pair();
        assert_eq!((pair.source, pair.target), ("en", "km"));
    }

    #[test]
    fn khmer_modes_translate_into_english() {
        for mode in [LanguageMode::Khmer, LanguageMode::KhmerAndEnglish] {
            let pair = mode.language_pair();
            assert_eq!((pair.source, pair.target), ("km", "en"));
        }
    }

    #[test]
    fn ocr_tags() {
        assert_eq!(LanguageMode::Khmer.ocr_tag(), "khm");
        assert_eq!(LanguageMode::English.ocr_tag(), "eng");
        assert_eq!(LanguageMode::KhmerAndEnglish.ocr_tag(), "khm+eng");
    }

    #[test]
    fn parse_mode() {
        assert_eq!("KHM".parse::<LanguageMode>().unwrap(), LanguageMode::Khmer);
        assert_eq!(
            "khm+eng".parse::<LanguageMode>().unwrap(),
            LanguageMode::KhmerAndEnglish
        );
        assert!("fra".parse::<LanguageMode>().is_err());
    }

    #[test]
    fn document_kind_from_path() {
        assert_eq!(
            DocumentKind::from_path(Path::new("scan.JPEG")).unwrap(),
            DocumentKind::Image
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("book.pdf")).unwrap(),
            DocumentKind::Pdf
        );
        assert!(matches!(
            DocumentKind::from_path(Path::new("notes.docx")),
            Err(AksarError::UnsupportedFormat(_))
        ));
        assert!(DocumentKind::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn view_toggles_back_and_forth() {
        assert_eq!(TextView::Original.toggled(), TextView::Translated);
        assert_eq!(TextView::Original.toggled().toggled(), TextView::Original);
    }
}
