// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// aksar-session: one open document, navigated page by page.
//
// The page store holds the decoded pages of the active document, the
// navigation controller moves a clamped cursor over it, the page processor
// turns one page into original + translated text, and the session actor
// serialises all of it behind a cloneable command handle.

pub mod handle;
pub mod navigation;
pub mod processor;
pub mod session;
pub mod store;

pub use handle::SessionHandle;
pub use navigation::{NavState, NavigationController};
pub use processor::PageProcessor;
pub use session::{Session, SessionSnapshot};
pub use store::{PageEntry, PageStore};

#[cfg(test)]
pub(crate) mod testing;
