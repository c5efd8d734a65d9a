// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pure-Rust OCR backend built on `ocrs`, with neural network models executed
// via `rten`.
//
// The published `ocrs` models recognise Latin script only, so this engine
// accepts the `eng` tag and rejects anything involving Khmer.
//
// # Model Setup
//
// Two model files are required:
//
// - `text-detection.rten` locates text regions in the page.
// - `text-recognition.rten` decodes characters from each region.
//
// Running `ocrs-cli` once downloads them to `$XDG_CACHE_HOME/ocrs`
// (typically `~/.cache/ocrs`), which is where they are looked for by default.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use aksar_core::error::{AksarError, Result};
use async_trait::async_trait;
use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

use super::{LayoutMode, OcrEngine};

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// The only language tag the bundled models can read.
const SUPPORTED_TAG: &str = "eng";

fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Where to find the detection and recognition models.
#[derive(Debug, Clone)]
pub struct NeuralConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for NeuralConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl NeuralConfig {
    /// Expects `dir` to contain `text-detection.rten` and `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for path in [&self.detection_model_path, &self.recognition_model_path] {
            if !path.exists() {
                return Err(AksarError::OcrError(format!(
                    "model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// `ocrs` engine with models loaded once and shared across page runs.
pub struct NeuralEngine {
    engine: Arc<OcrsEngine>,
}

impl NeuralEngine {
    /// Load both models. This is the expensive step; keep the engine around.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: NeuralConfig) -> Result<Self> {
        config.validate()?;

        let detection_model = load_model(&config.detection_model_path)?;
        let recognition_model = load_model(&config.recognition_model_path)?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| AksarError::OcrError(format!("failed to initialise OCR engine: {err}")))?;

        info!("Neural OCR engine initialised");
        Ok(Self {
            engine: Arc::new(engine),
        })
    }
}

fn load_model(path: &Path) -> Result<Model> {
    Model::load_file(path).map_err(|err| {
        AksarError::OcrError(format!("failed to load model from {}: {err}", path.display()))
    })
}

/// Reject tags the Latin-only models cannot serve.
fn check_language(language: &str) -> Result<()> {
    if language.trim() == SUPPORTED_TAG {
        Ok(())
    } else {
        Err(AksarError::OcrError(format!(
            "unsupported language tag '{language}' (the neural engine reads only '{SUPPORTED_TAG}')"
        )))
    }
}

fn recognize_blocking(engine: &OcrsEngine, image: image::RgbImage) -> Result<String> {
    let (width, height) = image.dimensions();
    let source = ImageSource::from_bytes(image.as_raw(), (width, height)).map_err(|err| {
        AksarError::OcrError(format!("failed to create image source ({width}x{height}): {err}"))
    })?;

    let input = engine
        .prepare_input(source)
        .map_err(|err| AksarError::OcrError(format!("OCR input preparation failed: {err}")))?;

    engine
        .get_text(&input)
        .map_err(|err| AksarError::OcrError(format!("OCR text recognition failed: {err}")))
}

#[async_trait]
impl OcrEngine for NeuralEngine {
    fn name(&self) -> &str {
        "ocrs"
    }

    #[instrument(skip_all, fields(language = %language, width = image.width(), height = image.height()))]
    async fn recognize(
        &self,
        image: &DynamicImage,
        language: &str,
        _layout: LayoutMode,
    ) -> Result<String> {
        check_language(language)?;

        let engine = Arc::clone(&self.engine);
        let rgb = image.to_rgb8();
        let text = tokio::task::spawn_blocking(move || recognize_blocking(&engine, rgb))
            .await
            .map_err(|err| AksarError::Internal(format!("OCR task failed: {err}")))??;

        debug!(line_count = text.lines().count(), "Neural OCR complete");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_dir() {
        let config = NeuralConfig::from_dir("/tmp/my-models");
        assert_eq!(
            config.detection_model_path,
            PathBuf::from("/tmp/my-models/text-detection.rten")
        );
        assert_eq!(
            config.recognition_model_path,
            PathBuf::from("/tmp/my-models/text-recognition.rten")
        );
    }

    #[test]
    fn missing_models_fail_validation() {
        let config = NeuralConfig::from_dir("/nonexistent/path/ocr-models");
        assert!(matches!(config.validate(), Err(AksarError::OcrError(_))));
    }

    #[test]
    fn khmer_tags_are_unsupported() {
        assert!(check_language("eng").is_ok());
        for tag in ["khm", "khm+eng", ""] {
            match check_language(tag) {
                Err(AksarError::OcrError(detail)) => assert!(detail.contains("unsupported language")),
                other => panic!("expected OcrError for {tag:?}, got {other:?}"),
            }
        }
    }
}
