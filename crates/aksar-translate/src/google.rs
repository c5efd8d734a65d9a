// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Client for the public web translation endpoint (`translate_a/single`).
//
// The endpoint answers with a nested JSON array whose first element lists the
// translated segments; the first string of each segment is the translation.

use aksar_core::error::{AksarError, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::Translator;

/// Default public endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("aksar/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| AksarError::Config(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots, timeouts).
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    #[instrument(skip_all, fields(source = %source, target = %target, chars = text.chars().count()))]
    async fn translate_text(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("client", "gtx"), ("sl", source), ("tl", target), ("dt", "t")])
            .form(&[("q", text)])
            .send()
            .await
            .map_err(|err| AksarError::TranslationUnavailable(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AksarError::TranslationUnavailable(format!(
                "translation service returned status {status}"
            )));
        }

        let body: Value = response.json().await.map_err(|err| {
            AksarError::TranslationUnavailable(format!("malformed response: {err}"))
        })?;

        let translated = join_segments(&body)?;
        debug!(chars = translated.chars().count(), "translation received");
        Ok(translated)
    }
}

/// Concatenate the translated piece of every segment in `body[0]`.
fn join_segments(body: &Value) -> Result<String> {
    let segments = body.get(0).and_then(Value::as_array).ok_or_else(|| {
        AksarError::TranslationUnavailable("malformed response: missing segment list".into())
    })?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}
