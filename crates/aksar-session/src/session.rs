// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Owned state of the one active document.

use std::path::PathBuf;

use aksar_core::types::{DocumentInfo, LanguageMode, PageResult, TextView};
use image::DynamicImage;
use tracing::{debug, info};

use crate::navigation::{NavState, NavigationController};
use crate::store::PageEntry;

/// Read-only view of the session handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub document: Option<DocumentInfo>,
    pub state: NavState,
    pub mode: LanguageMode,
    /// Last successful page run. May belong to an earlier page than `state`
    /// when the latest run failed.
    pub result: Option<PageResult>,
    pub view: TextView,
    /// A page run is in flight.
    pub busy: bool,
}

impl SessionSnapshot {
    /// Text for the selected view, if any page has been processed.
    pub fn displayed_text(&self) -> Option<&str> {
        self.result.as_ref().map(|result| result.text(self.view))
    }

    /// "Page i of n" for the cursor position.
    pub fn page_label(&self) -> Option<String> {
        match (self.state, &self.document) {
            (NavState::AtPage(index), Some(document)) => {
                Some(format!("Page {} of {}", index + 1, document.page_count))
            }
            _ => None,
        }
    }

    /// The shown result belongs to a different page than the cursor.
    pub fn result_is_stale(&self) -> bool {
        match (self.state, &self.result) {
            (NavState::AtPage(index), Some(result)) => result.page_index != index,
            _ => false,
        }
    }
}

/// Document, cursor, mode, current result and view.
///
/// Rebuilt on every load and never persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    nav: NavigationController,
    mode: LanguageMode,
    document: Option<DocumentInfo>,
    current: Option<PageResult>,
    view: TextView,
}

impl Session {
    pub fn new(mode: LanguageMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Replace everything with a freshly decoded document.
    pub fn install(
        &mut self,
        source: impl Into<PathBuf>,
        pages: Vec<DynamicImage>,
        mode: LanguageMode,
    ) -> NavState {
        let document = DocumentInfo::new(source, pages.len());
        info!(
            id = %document.id,
            source = %document.source.display(),
            page_count = document.page_count,
            mode = %mode,
            "document installed"
        );
        self.document = Some(document);
        self.mode = mode;
        self.current = None;
        self.view = TextView::Original;
        self.nav.load(pages)
    }

    pub fn next(&mut self) -> Option<PageEntry> {
        self.nav.next()?;
        self.nav.current_page().cloned()
    }

    pub fn prev(&mut self) -> Option<PageEntry> {
        self.nav.prev()?;
        self.nav.current_page().cloned()
    }

    pub fn current_page(&self) -> Option<PageEntry> {
        self.nav.current_page().cloned()
    }

    /// Make `result` current if it is for the page under the cursor in the
    /// active mode. Returns whether it was accepted.
    pub fn publish(&mut self, result: PageResult) -> bool {
        let fresh = self.nav.state() == NavState::AtPage(result.page_index)
            && result.language_mode == self.mode;
        if fresh {
            self.current = Some(result);
        } else {
            debug!(page = result.page_index + 1, "dropping result for a page no longer shown");
        }
        fresh
    }

    pub fn toggle_view(&mut self) -> TextView {
        self.view = self.view.toggled();
        self.view
    }

    pub fn mode(&self) -> LanguageMode {
        self.mode
    }

    pub fn state(&self) -> NavState {
        self.nav.state()
    }

    pub fn current_result(&self) -> Option<&PageResult> {
        self.current.as_ref()
    }

    pub fn snapshot(&self, busy: bool) -> SessionSnapshot {
        SessionSnapshot {
            document: self.document.clone(),
            state: self.nav.state(),
            mode: self.mode,
            result: self.current.clone(),
            view: self.view,
            busy,
        }
    }
}
