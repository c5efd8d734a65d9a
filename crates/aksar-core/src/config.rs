// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AksarError, Result};
use crate::types::LanguageMode;

/// File name of the JSON settings file inside the config directory.
pub const CONFIG_FILE: &str = "config.json";

/// Application settings. Every field has a default so partial files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Language mode used when `open` is given no explicit mode.
    pub default_mode: LanguageMode,
    pub ocr: OcrSettings,
    pub translation: TranslationSettings,
    pub pdf: PdfSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_mode: LanguageMode::Khmer,
            ocr: OcrSettings::default(),
            translation: TranslationSettings::default(),
            pdf: PdfSettings::default(),
        }
    }
}

/// Which OCR backend recognises page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrBackendKind {
    /// The `tesseract` command-line engine (supports `khm`).
    #[default]
    Tesseract,
    /// The pure-Rust `ocrs` engine (Latin script only, `neural-ocr` feature).
    Neural,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    pub backend: OcrBackendKind,
    /// Executable name or path of the Tesseract CLI.
    pub tesseract_binary: PathBuf,
    /// Directory containing `khm.traineddata` / `eng.traineddata`.
    pub tessdata_dir: Option<PathBuf>,
    /// Directory containing the `ocrs` detection/recognition models.
    pub model_dir: Option<PathBuf>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            backend: OcrBackendKind::Tesseract,
            tesseract_binary: PathBuf::from("tesseract"),
            tessdata_dir: None,
            model_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// Endpoint of the public web translation service.
    pub endpoint: String,
    /// Upper bound on one `translate` call, retries included.
    pub timeout_secs: u64,
    /// Retries for transient failures inside the timeout budget.
    pub max_retries: u32,
    /// Number of translations kept in memory.
    pub cache_capacity: usize,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.googleapis.com/translate_a/single".into(),
            timeout_secs: 15,
            max_retries: 2,
            cache_capacity: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    /// Upscaling factor applied to the page's native size when rasterising.
    pub render_scale: f32,
    /// Directory holding the PDFium shared library, if not installed system-wide.
    pub pdfium_library_dir: Option<PathBuf>,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            render_scale: 2.0,
            pdfium_library_dir: None,
        }
    }
}

impl AppConfig {
    /// Load settings from `path`. A missing file yields the defaults; a file
    /// that exists but does not parse is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };

        let config: Self = serde_json::from_str(&data).map_err(|err| {
            AksarError::Config(format!("{} is not valid: {}", path.display(), err))
        })?;
        config.validate()?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Load settings from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir().join(CONFIG_FILE))
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.translation.timeout_secs == 0 {
            return Err(AksarError::Config(
                "translation.timeout_secs must be at least 1".into(),
            ));
        }
        if !(self.pdf.render_scale.is_finite() && self.pdf.render_scale > 0.0) {
            return Err(AksarError::Config(format!(
                "pdf.render_scale must be positive, got {}",
                self.pdf.render_scale
            )));
        }
        Ok(())
    }
}

/// Return the configuration directory (`$XDG_CONFIG_HOME/aksar` or
/// `~/.config/aksar`). The directory is not created.
pub fn config_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg)
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config")
    } else {
        // Last resort
        PathBuf::from(".")
    };
    base.join("aksar")
}
