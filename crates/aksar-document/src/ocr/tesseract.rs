// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tesseract CLI backend.
//
// The page is written as a PNG to a temporary file and handed to
// `tesseract <file> stdout -l <lang> --psm <mode>`. The child is killed if the
// future driving it is dropped, so aborting a page run also stops the engine.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use aksar_core::error::{AksarError, Result};
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use super::{LayoutMode, OcrEngine};

/// Runs the `tesseract` executable for every recognition request.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    tessdata_dir: Option<PathBuf>,
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TesseractEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            tessdata_dir: None,
        }
    }

    /// Look for `<lang>.traineddata` in `dir` instead of the default location.
    pub fn with_tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tessdata_dir = Some(dir.into());
        self
    }

    fn command(&self, input: &Path, language: &str, layout: LayoutMode) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(input)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("--psm")
            .arg(layout.page_segmentation_mode().to_string());
        if let Some(dir) = &self.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    #[instrument(skip_all, fields(language = %language, width = image.width(), height = image.height()))]
    async fn recognize(
        &self,
        image: &DynamicImage,
        language: &str,
        layout: LayoutMode,
    ) -> Result<String> {
        if language.trim().is_empty() {
            return Err(AksarError::OcrError("empty language tag".into()));
        }

        let page = image.clone();
        let input = tokio::task::spawn_blocking(move || write_input(&page, &std::env::temp_dir()))
            .await
            .map_err(|err| AksarError::OcrError(format!("page encoding task failed: {err}")))??;

        let output = self
            .command(input.path(), language, layout)
            .output()
            .await
            .map_err(|err| {
                AksarError::OcrError(format!(
                    "failed to run {}: {err}",
                    self.binary.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, "tesseract exited with an error");
            return Err(AksarError::OcrError(format!(
                "tesseract failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        // Tesseract terminates each page with a form feed.
        let text = String::from_utf8_lossy(&output.stdout).replace('\u{c}', "");
        info!(chars = text.chars().count(), "Tesseract recognition complete");
        Ok(text)
    }
}

/// Encode `image` as PNG into a fresh temporary file under `dir`.
///
/// Every failure is an `OcrError`: the file only exists to feed the engine.
fn write_input(image: &DynamicImage, dir: &Path) -> Result<NamedTempFile> {
    let mut input = tempfile::Builder::new()
        .prefix("aksar-page-")
        .suffix(".png")
        .tempfile_in(dir)
        .map_err(|err| {
            AksarError::OcrError(format!("failed to create OCR input in {}: {err}", dir.display()))
        })?;

    image
        .write_to(input.as_file_mut(), ImageFormat::Png)
        .map_err(|err| AksarError::OcrError(format!("failed to encode page image: {err}")))?;
    input
        .as_file_mut()
        .flush()
        .map_err(|err| AksarError::OcrError(format!("failed to write OCR input: {err}")))?;

    debug!(path = %input.path().display(), "Wrote OCR input");
    Ok(input)
}
