// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Decoded pages of the active document plus the navigation cursor.

use std::sync::Arc;

use image::DynamicImage;

/// One decoded page. Immutable once created; cheap to clone.
#[derive(Debug, Clone)]
pub struct PageEntry {
    /// 0-based position in the document.
    pub index: usize,
    pub image: Arc<DynamicImage>,
}

/// Ordered pages with a cursor.
///
/// Invariant: `cursor` is `Some(i)` with `i < len` exactly when the store is
/// non-empty. The entry list is never edited; loading a new document builds a
/// new store.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    entries: Vec<PageEntry>,
    cursor: Option<usize>,
}

impl PageStore {
    /// Build a store from pages in document order, cursor on the first page.
    pub fn from_images(images: Vec<DynamicImage>) -> Self {
        let entries: Vec<PageEntry> = images
            .into_iter()
            .enumerate()
            .map(|(index, image)| PageEntry {
                index,
                image: Arc::new(image),
            })
            .collect();
        let cursor = if entries.is_empty() { None } else { Some(0) };
        Self { entries, cursor }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&PageEntry> {
        self.cursor.and_then(|index| self.entries.get(index))
    }

    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    /// Move the cursor to `index`. Out-of-range indices are refused.
    pub(crate) fn set_cursor(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.cursor = Some(index);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::blank_pages;

    #[test]
    fn empty_store_has_no_cursor() {
        let store = PageStore::from_images(Vec::new());
        assert!(store.is_empty());
        assert_eq!(store.cursor(), None);
        assert!(store.current().is_none());
    }

    #[test]
    fn cursor_starts_on_first_page() {
        let store = PageStore::from_images(blank_pages(3));
        assert_eq!(store.len(), 3);
        assert_eq!(store.cursor(), Some(0));
        assert_eq!(store.current().map(|page| page.index), Some(0));
        let indices: Vec<usize> = store.entries().iter().map(|page| page.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn cursor_refuses_out_of_range() {
        let mut store = PageStore::from_images(blank_pages(2));
        assert!(store.set_cursor(1));
        assert!(!store.set_cursor(2));
        assert_eq!(store.cursor(), Some(1));
    }
}
