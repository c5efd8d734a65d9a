// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page navigation with a clamped cursor.

use image::DynamicImage;
use tracing::debug;

use crate::store::{PageEntry, PageStore};

/// Where the user is in the active document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    /// No document, or a document with no pages.
    #[default]
    Empty,
    /// Viewing the page at this 0-based index.
    AtPage(usize),
}

/// Owns the page store and moves its cursor.
///
/// `next` and `prev` clamp at the ends (no wrap-around) and report whether the
/// cursor actually moved, which is what decides whether a page run starts.
#[derive(Debug, Clone, Default)]
pub struct NavigationController {
    store: PageStore,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole document. Returns `AtPage(0)` for a non-empty
    /// document, `Empty` otherwise.
    pub fn load(&mut self, pages: Vec<DynamicImage>) -> NavState {
        self.store = PageStore::from_images(pages);
        debug!(page_count = self.page_count(), "page store replaced");
        self.state()
    }

    pub fn state(&self) -> NavState {
        match self.store.cursor() {
            Some(index) => NavState::AtPage(index),
            None => NavState::Empty,
        }
    }

    /// Advance one page. `Some(index)` if the cursor moved.
    pub fn next(&mut self) -> Option<usize> {
        let target = self.store.cursor()?.checked_add(1)?;
        self.move_to(target)
    }

    /// Go back one page. `Some(index)` if the cursor moved.
    pub fn prev(&mut self) -> Option<usize> {
        let target = self.store.cursor()?.checked_sub(1)?;
        self.move_to(target)
    }

    fn move_to(&mut self, index: usize) -> Option<usize> {
        if self.store.set_cursor(index) {
            debug!(page = index + 1, "cursor moved");
            Some(index)
        } else {
            None
        }
    }

    pub fn current_page(&self) -> Option<&PageEntry> {
        self.store.current()
    }

    pub fn page_count(&self) -> usize {
        self.store.len()
    }
}
