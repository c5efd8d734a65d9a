// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory document source, OCR engine and translator for tests.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use aksar_core::error::{AksarError, Result};
use aksar_document::{DocumentSource, LayoutMode, OcrEngine};
use aksar_translate::{Translator, TranslationRouter};
use async_trait::async_trait;
use image::{DynamicImage, GrayImage, Luma};

use crate::processor::PageProcessor;

/// `count` white pages; page `i` is `i + 1` pixels wide so OCR output can name it.
pub(crate) fn blank_pages(count: usize) -> Vec<DynamicImage> {
    (0..count)
        .map(|i| DynamicImage::ImageLuma8(GrayImage::from_pixel(i as u32 + 1, 4, Luma([255]))))
        .collect()
}

/// Serves documents by file name: `five.pdf`, `three.pdf`, `empty.pdf`,
/// `broken.png`; anything else is a one-page image.
pub(crate) struct FakeSource;

impl DocumentSource for FakeSource {
    fn load(&self, path: &Path) -> Result<Vec<DynamicImage>> {
        match path.file_name().and_then(|name| name.to_str()) {
            Some("five.pdf") => Ok(blank_pages(5)),
            Some("three.pdf") => Ok(blank_pages(3)),
            Some("empty.pdf") => Ok(Vec::new()),
            Some("broken.png") => Err(AksarError::DecodeError("broken.png: bad header".into())),
            _ => Ok(blank_pages(1)),
        }
    }
}

/// Reads "ទំព័រ N" off page N, optionally slowly or not at all.
#[derive(Default)]
pub(crate) struct FakeOcr {
    pub delay_ms: AtomicUsize,
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl FakeOcr {
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as usize, Ordering::SeqCst);
    }
}

#[async_trait]
impl OcrEngine for FakeOcr {
    fn name(&self) -> &str {
        "fake-ocr"
    }

    async fn recognize(
        &self,
        image: &DynamicImage,
        _language: &str,
        _layout: LayoutMode,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst) as u64;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(AksarError::OcrError("Failed loading language 'khm'".into()));
        }
        Ok(format!("ទំព័រ {}   \n", image.width()))
    }
}

/// Tags text with its direction, or fails without retry when `fail` is set.
#[derive(Default)]
pub(crate) struct FakeTranslator {
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl Translator for FakeTranslator {
    fn name(&self) -> &str {
        "fake-translator"
    }

    async fn translate_text(&self, text: &str, source: &str, target: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AksarError::TranslationUnavailable("malformed response".into()));
        }
        Ok(format!("[{source}->{target}] {text}"))
    }
}

pub(crate) fn processor(ocr: &Arc<FakeOcr>, translator: &Arc<FakeTranslator>) -> PageProcessor {
    let ocr: Arc<dyn OcrEngine> = ocr.clone();
    let translator: Arc<dyn Translator> = translator.clone();
    PageProcessor::new(ocr, TranslationRouter::new(translator))
}
