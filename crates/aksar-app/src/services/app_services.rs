// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Builds the backends named in the configuration and starts the session
// actor. Must be called from inside a Tokio runtime.

use std::sync::Arc;

use aksar_core::config::{AppConfig, OcrBackendKind, OcrSettings};
use aksar_core::error::Result;
use aksar_document::{DocumentLoader, DocumentSource, OcrEngine, PdfRenderer, TesseractEngine};
use aksar_session::{PageProcessor, SessionHandle};
use aksar_translate::{GoogleTranslator, TranslationRouter, Translator};
use tracing::info;

/// Everything the shell needs, built once at startup.
#[derive(Clone)]
pub struct AppServices {
    config: Arc<AppConfig>,
    session: SessionHandle,
}

impl AppServices {
    /// Wire up OCR, translation and document loading from `config`.
    pub fn init(config: AppConfig) -> Result<Self> {
        config.validate()?;

        let ocr = build_ocr_engine(&config.ocr)?;
        let translator: Arc<dyn Translator> =
            Arc::new(GoogleTranslator::new(config.translation.endpoint.clone())?);
        let router = TranslationRouter::from_settings(translator, &config.translation);
        let processor = PageProcessor::new(ocr, router);
        let source = build_document_source(&config);

        info!(
            ocr = ocr_backend_label(&config.ocr),
            endpoint = %config.translation.endpoint,
            mode = %config.default_mode,
            "app services initialised"
        );

        let session = SessionHandle::spawn(source, processor, config.default_mode);
        Ok(Self {
            config: Arc::new(config),
            session,
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

fn build_document_source(config: &AppConfig) -> Arc<dyn DocumentSource> {
    let mut renderer = PdfRenderer::new(config.pdf.render_scale);
    if let Some(dir) = &config.pdf.pdfium_library_dir {
        renderer = renderer.with_library_dir(dir);
    }
    Arc::new(DocumentLoader::new(renderer))
}

fn build_ocr_engine(settings: &OcrSettings) -> Result<Arc<dyn OcrEngine>> {
    match settings.backend {
        OcrBackendKind::Tesseract => {
            let mut engine = TesseractEngine::new(&settings.tesseract_binary);
            if let Some(dir) = &settings.tessdata_dir {
                engine = engine.with_tessdata_dir(dir);
            }
            Ok(Arc::new(engine))
        }
        OcrBackendKind::Neural => build_neural_engine(settings),
    }
}

#[cfg(feature = "neural-ocr")]
fn build_neural_engine(settings: &OcrSettings) -> Result<Arc<dyn OcrEngine>> {
    use aksar_document::{NeuralConfig, NeuralEngine};

    let config = match &settings.model_dir {
        Some(dir) => NeuralConfig::from_dir(dir),
        None => NeuralConfig::default(),
    };
    Ok(Arc::new(NeuralEngine::new(config)?))
}

#[cfg(not(feature = "neural-ocr"))]
fn build_neural_engine(_settings: &OcrSettings) -> Result<Arc<dyn OcrEngine>> {
    Err(aksar_core::error::AksarError::Config(
        "ocr.backend is \"neural\" but this build lacks the neural-ocr feature".into(),
    ))
}

fn ocr_backend_label(settings: &OcrSettings) -> &'static str {
    match settings.backend {
        OcrBackendKind::Tesseract => "tesseract",
        OcrBackendKind::Neural => "neural",
    }
}
