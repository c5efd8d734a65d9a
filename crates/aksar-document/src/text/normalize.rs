// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cleanup of raw OCR output for Khmer pages.
//
// Tesseract's Khmer model tends to emit stray symbols from unrelated scripts,
// runs of blank lines and lines made only of punctuation. The passes below strip
// those while leaving Khmer, Khmer Symbols and printable ASCII untouched.

use aksar_core::LanguageMode;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Anything outside Khmer (U+1780–17FF), Khmer Symbols (U+19E0–19FF),
/// printable ASCII and the three line/tab controls.
static FOREIGN_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\x{1780}-\x{17FF}\x{19E0}-\x{19FF}\x{20}-\x{7E}\n\r\t]")
        .expect("Foreign character regex pattern is valid and should compile")
});
static BLANK_LINE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("Blank line regex pattern is valid and should compile"));
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").expect("Space run regex pattern is valid and should compile"));
/// A line holding no word character and no Khmer character.
static NOISE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n[^\w\x{1780}-\x{17FF}]+\n").expect("Noise line regex pattern is valid and should compile")
});

/// Clean OCR text according to the active language mode.
///
/// `English` text is returned unchanged. For modes involving Khmer the passes
/// run in a fixed order: drop foreign characters, collapse blank-line runs to a
/// single empty line, collapse space runs, remove noise lines, trim.
///
/// The function is idempotent: `normalize(&normalize(t, m), m) == normalize(t, m)`.
pub fn normalize(text: &str, mode: LanguageMode) -> String {
    if !mode.involves_khmer() {
        return text.to_owned();
    }

    let filtered = FOREIGN_CHARS.replace_all(text, "");
    let paragraphs = BLANK_LINE_RUN.replace_all(&filtered, "\n\n");
    let spaced = SPACE_RUN.replace_all(&paragraphs, " ");
    let denoised = NOISE_LINE.replace_all(&spaced, "\n");
    let cleaned = denoised.trim().to_owned();

    debug!(
        input_chars = text.chars().count(),
        output_chars = cleaned.chars().count(),
        "Normalized OCR text"
    );
    cleaned
}
