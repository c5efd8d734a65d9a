// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The four-stage page run: preprocess → OCR → normalize → translate.

use std::sync::Arc;

use aksar_core::error::{AksarError, Result};
use aksar_core::types::{LanguageMode, PageResult, Stage};
use aksar_document::{LayoutMode, OcrEngine, normalize, preprocess};
use aksar_translate::TranslationRouter;
use tracing::{debug, info, instrument};

use crate::store::PageEntry;

/// Runs one page through the pipeline.
///
/// Stages run strictly in order. The first failure ends the run and comes back
/// as `AksarError::Page` naming the 1-based page and the stage; there is no
/// partial result.
#[derive(Clone)]
pub struct PageProcessor {
    ocr: Arc<dyn OcrEngine>,
    router: TranslationRouter,
}

impl PageProcessor {
    pub fn new(ocr: Arc<dyn OcrEngine>, router: TranslationRouter) -> Self {
        Self { ocr, router }
    }

    #[instrument(skip_all, fields(page = page.index + 1, mode = %mode, ocr = self.ocr.name()))]
    pub async fn process_page(&self, page: &PageEntry, mode: LanguageMode) -> Result<PageResult> {
        let index = page.index;

        let image = Arc::clone(&page.image);
        let prepared = tokio::task::spawn_blocking(move || preprocess(&image))
            .await
            .map_err(|err| {
                AksarError::Internal(format!("preprocessing task failed: {err}"))
                    .at_page(index, Stage::Preprocess)
            })?;
        debug!(stage = %Stage::Preprocess, "stage complete");

        let raw = self
            .ocr
            .recognize(&prepared, mode.ocr_tag(), LayoutMode::UniformBlock)
            .await
            .map_err(|err| err.at_page(index, Stage::Ocr))?;
        debug!(stage = %Stage::Ocr, chars = raw.chars().count(), "stage complete");

        let original = normalize(&raw, mode);
        debug!(stage = %Stage::Normalize, chars = original.chars().count(), "stage complete");

        let translated = self
            .router
            .translate(&original, mode)
            .await
            .map_err(|err| err.at_page(index, Stage::Translate))?;

        info!("page processed");
        Ok(PageResult::new(index, original, translated, mode))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::store::PageStore;
    use crate::testing::{FakeOcr, FakeTranslator, blank_pages, processor};

    fn second_page() -> PageEntry {
        PageStore::from_images(blank_pages(2)).entries()[1].clone()
    }

    #[tokio::test]
    async fn khmer_page_is_cleaned_and_translated() {
        let ocr = Arc::new(FakeOcr::default());
        let translator = Arc::new(FakeTranslator::default());
        let result = processor(&ocr, &translator)
            .process_page(&second_page(), LanguageMode::Khmer)
            .await
            .unwrap();

        assert_eq!(result.page_index, 1);
        assert_eq!(result.original, "ទំព័រ 2");
        assert_eq!(result.translated, "[km->en] ទំព័រ 2");
        assert_eq!(result.language_mode, LanguageMode::Khmer);
    }

    #[tokio::test]
    async fn english_text_is_left_raw() {
        let ocr = Arc::new(FakeOcr::default());
        let translator = Arc::new(FakeTranslator::default());
        let result = processor(&ocr, &translator)
            .process_page(&second_page(), LanguageMode::English)
            .await
            .unwrap();

        assert_eq!(result.original, "ទំព័រ 2   \n");
        assert!(result.translated.starts_with("[en->km]"));
    }

    #[tokio::test]
    async fn ocr_failure_names_page_and_stage() {
        let ocr = Arc::new(FakeOcr::default());
        ocr.fail.store(true, Ordering::SeqCst);
        let translator = Arc::new(FakeTranslator::default());

        let err = processor(&ocr, &translator)
            .process_page(&second_page(), LanguageMode::Khmer)
            .await
            .unwrap_err();

        assert!(matches!(err, AksarError::Page { page: 2, stage: Stage::Ocr, .. }));
        assert!(matches!(err.root(), AksarError::OcrError(_)));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn translation_failure_is_unavailable() {
        let ocr = Arc::new(FakeOcr::default());
        let translator = Arc::new(FakeTranslator::default());
        translator.fail.store(true, Ordering::SeqCst);

        let err = processor(&ocr, &translator)
            .process_page(&second_page(), LanguageMode::KhmerAndEnglish)
            .await
            .unwrap_err();

        assert!(matches!(err, AksarError::Page { page: 2, stage: Stage::Translate, .. }));
        assert!(matches!(err.root(), AksarError::TranslationUnavailable(_)));
    }
}
