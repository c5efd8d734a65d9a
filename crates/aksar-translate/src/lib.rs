// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// aksar-translate: machine translation of page text.
//
// The router picks the language pair from the active mode, consults an
// in-memory cache, retries transient failures and bounds the whole call with a
// timeout. Backends implement the `Translator` trait; `GoogleTranslator` talks
// to the public web translation endpoint.

pub mod cache;
pub mod google;
pub mod retry;
pub mod router;

use aksar_core::error::Result;
use async_trait::async_trait;

pub use cache::{CacheKey, TranslationCache};
pub use google::GoogleTranslator;
pub use retry::RetryConfig;
pub use router::TranslationRouter;

/// A machine translation backend.
///
/// `source` and `target` are ISO 639-1 codes (`km`, `en`). Failures should be
/// reported as `AksarError::TranslationUnavailable`.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    async fn translate_text(&self, text: &str, source: &str, target: &str) -> Result<String>;
}
