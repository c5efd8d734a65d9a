// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Retry engine with exponential backoff + jitter for translation requests.
//
// Classifies errors into Transient (auto-retry), UserAction (wait for user),
// and Permanent (give up). Only transient errors trigger automatic retries.

use std::future::Future;
use std::time::Duration;

use aksar_core::error::{AksarError, Result};
use aksar_core::types::ErrorClass;
use tracing::{debug, info, warn};

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first try.
    pub max_retries: u32,
    /// Base delay between retries (exponential backoff).
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }
}

/// Result of evaluating whether to retry.
#[derive(Debug)]
pub enum RetryDecision {
    /// Retry after this delay.
    RetryAfter(Duration),
    /// Do not retry: the error is permanent or needs the user.
    GiveUp(ErrorClass),
    /// Maximum retries exhausted.
    Exhausted,
}

/// Classify an `AksarError` into an `ErrorClass` for retry decisions.
pub fn classify_error(err: &AksarError) -> ErrorClass {
    match err {
        AksarError::TranslationUnavailable(detail) => classify_service_detail(detail),
        AksarError::OcrError(_) => ErrorClass::Transient,
        AksarError::Page { source, .. } => classify_error(source),

        // User action needed
        AksarError::UnsupportedFormat(_)
        | AksarError::PdfRendererUnavailable(_)
        | AksarError::Config(_) => ErrorClass::UserAction,

        // Permanent: bad data
        AksarError::DecodeError(_)
        | AksarError::EmptyDocument
        | AksarError::Superseded { .. }
        | AksarError::Internal(_)
        | AksarError::Serialization(_) => ErrorClass::Permanent,

        // IO errors depend on the kind
        AksarError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                ErrorClass::UserAction
            }
            _ => ErrorClass::Transient,
        },
    }
}

/// Classify a translation service error detail string.
fn classify_service_detail(detail: &str) -> ErrorClass {
    let lower = detail.to_ascii_lowercase();

    // The service answered, but not with anything we can read
    if lower.contains("malformed") {
        return ErrorClass::Permanent;
    }

    // Rate limiting is worth waiting out; other client errors are not
    if lower.contains("status 429") {
        return ErrorClass::Transient;
    }
    if lower.contains("status 4") {
        return ErrorClass::Permanent;
    }

    // Default to transient (network blips, 5xx, resets)
    ErrorClass::Transient
}

/// Decide whether to retry based on the error class and attempt count.
pub fn should_retry(err: &AksarError, attempt: u32, config: &RetryConfig) -> RetryDecision {
    let class = classify_error(err);

    match class {
        ErrorClass::Permanent => {
            info!("permanent error, not retrying");
            RetryDecision::GiveUp(ErrorClass::Permanent)
        }
        ErrorClass::UserAction => {
            info!("user action required, not retrying");
            RetryDecision::GiveUp(ErrorClass::UserAction)
        }
        ErrorClass::Transient => {
            if attempt >= config.max_retries {
                warn!(attempt, max = config.max_retries, "retry limit exhausted");
                RetryDecision::Exhausted
            } else {
                let delay = compute_delay(attempt, config);
                debug!(attempt, delay_ms = delay.as_millis(), "scheduling retry");
                RetryDecision::RetryAfter(delay)
            }
        }
    }
}

/// Run `operation` until it succeeds, fails permanently or runs out of retries.
///
/// The closure receives the 0-based attempt number. The last error is returned
/// unchanged.
pub async fn retry_async<T, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => match should_retry(&err, attempt, config) {
                RetryDecision::RetryAfter(delay) => {
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::GiveUp(_) | RetryDecision::Exhausted => return Err(err),
            },
        }
    }
}

/// Compute exponential backoff delay with jitter.
///
/// delay = min(base * 2^attempt + jitter, max_delay)
fn compute_delay(attempt: u32, config: &RetryConfig) -> Duration {
    let base_ms = config.base_delay.as_millis() as u64;
    let exp_ms = base_ms.saturating_mul(1u64 << attempt.min(10));

    let jitter_ms = jitter(base_ms, attempt);
    let total_ms = exp_ms.saturating_add(jitter_ms);
    let capped_ms = total_ms.min(config.max_delay.as_millis() as u64);

    Duration::from_millis(capped_ms)
}

/// Deterministic spread in [0, base) derived from the attempt number.
fn jitter(base_ms: u64, attempt: u32) -> u64 {
    let hash = (attempt as u64).wrapping_mul(6364136223846793005);
    hash % base_ms.max(1)
}
