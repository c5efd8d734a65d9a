// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-text rendering of session snapshots and errors.

use std::fmt::Write as _;

use aksar_core::error::AksarError;
use aksar_core::human_errors::{Severity, humanize_error};
use aksar_core::types::TextView;
use aksar_session::{NavState, SessionSnapshot};

/// Render the page under the cursor.
pub fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let Some(document) = &snapshot.document else {
        return "No document open. Use: open <path> [mode]".into();
    };

    if snapshot.state == NavState::Empty {
        return render_error(&AksarError::EmptyDocument);
    }

    let name = document
        .source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| document.source.display().to_string());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "== {} | {} | {} | {} ==",
        name,
        snapshot.mode.label(),
        snapshot.page_label().unwrap_or_default(),
        view_label(snapshot.view),
    );

    match (&snapshot.result, snapshot.displayed_text()) {
        (Some(result), Some(text)) => {
            if snapshot.result_is_stale() {
                let _ = writeln!(
                    out,
                    "(showing page {}; this page has not been read yet)",
                    result.page_index + 1
                );
            }
            if text.trim().is_empty() {
                out.push_str("(no text found on this page)");
            } else {
                out.push_str(text.trim_end());
            }
        }
        _ => out.push_str("(this page has not been read yet)"),
    }
    out
}

/// Render an error the way a user should see it.
pub fn render_error(err: &AksarError) -> String {
    let human = humanize_error(err);
    let prefix = match human.severity {
        Severity::Info => "",
        Severity::Transient | Severity::ActionRequired | Severity::Permanent => "Error: ",
    };
    let mut out = format!("{prefix}{}\n{}", human.message, human.suggestion);
    if human.retriable {
        out.push_str("\nType 'retry' to try again.");
    }
    out
}

fn view_label(view: TextView) -> &'static str {
    match view {
        TextView::Original => "original",
        TextView::Translated => "translated",
    }
}
