// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Translation routing: language pair selection, caching, retry and timeout.

use std::sync::Arc;
use std::time::Duration;

use aksar_core::config::TranslationSettings;
use aksar_core::error::{AksarError, Result};
use aksar_core::types::{LanguageMode, LanguagePair};
use tracing::{debug, info, instrument, warn};

use crate::Translator;
use crate::cache::{CacheKey, TranslationCache};
use crate::retry::{RetryConfig, retry_async};

/// Default bound on a single `translate` call, retries included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Routes page text to a translation backend in the direction fixed by the
/// active language mode.
///
/// Never returns untranslated text: every failure, including the timeout,
/// surfaces as `AksarError::TranslationUnavailable`.
#[derive(Clone)]
pub struct TranslationRouter {
    backend: Arc<dyn Translator>,
    cache: Arc<TranslationCache>,
    timeout: Duration,
    retry: RetryConfig,
}

impl TranslationRouter {
    pub fn new(backend: Arc<dyn Translator>) -> Self {
        Self {
            backend,
            cache: Arc::new(TranslationCache::default()),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
        }
    }

    /// Build a router from the `translation` section of the config file.
    pub fn from_settings(backend: Arc<dyn Translator>, settings: &TranslationSettings) -> Self {
        Self::new(backend)
            .with_timeout(Duration::from_secs(settings.timeout_secs))
            .with_cache(Arc::new(TranslationCache::new(settings.cache_capacity)))
            .with_retry(RetryConfig {
                max_retries: settings.max_retries,
                ..RetryConfig::default()
            })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache(mut self, cache: Arc<TranslationCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Translation direction for `mode`: Khmer and mixed pages go km→en,
    /// English pages go en→km.
    pub fn route(mode: LanguageMode) -> LanguagePair {
        mode.language_pair()
    }

    /// Translate `text` in the direction fixed by `mode`.
    ///
    /// Whitespace-only text translates to an empty string without touching the
    /// backend. Successful translations are cached; failures are not.
    #[instrument(skip_all, fields(mode = %mode, chars = text.chars().count()))]
    pub async fn translate(&self, text: &str, mode: LanguageMode) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let pair = Self::route(mode);
        let key = CacheKey::new(pair.source, pair.target, text);
        if let Some(hit) = self.cache.get(&key) {
            debug!(source = pair.source, target = pair.target, "translation cache hit");
            return Ok(hit);
        }

        let backend = &self.backend;
        let attempts = retry_async(&self.retry, |attempt| {
            if attempt > 0 {
                debug!(attempt, backend = backend.name(), "retrying translation");
            }
            backend.translate_text(text, pair.source, pair.target)
        });

        let translated = match tokio::time::timeout(self.timeout, attempts).await {
            Ok(Ok(translated)) => translated,
            Ok(Err(err)) => {
                warn!(error = %err, "translation failed");
                return Err(unavailable(err));
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis(), "translation timed out");
                return Err(AksarError::TranslationUnavailable(format!(
                    "no answer within {} ms",
                    self.timeout.as_millis()
                )));
            }
        };

        info!(
            source = pair.source,
            target = pair.target,
            chars = translated.chars().count(),
            "page text translated"
        );
        self.cache.insert(key, translated.clone());
        Ok(translated)
    }
}

/// Keep the error taxonomy closed: anything a backend reports is "unavailable".
fn unavailable(err: AksarError) -> AksarError {
    match err {
        AksarError::TranslationUnavailable(_) => err,
        other => AksarError::TranslationUnavailable(other.to_string()),
    }
}
