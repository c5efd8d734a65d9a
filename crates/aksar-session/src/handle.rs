// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session actor and its command handle.
//
// A single task owns the `Session`, so every mutation is serialised. At most
// one page run is in flight; a newer navigation or load aborts it and its
// caller gets `AksarError::Superseded`. Loading decodes on the blocking pool
// and installs the new page store only once every page has decoded.

use std::path::PathBuf;
use std::sync::Arc;

use aksar_core::error::{AksarError, Result};
use aksar_core::types::{DocumentKind, LanguageMode, PageResult};
use aksar_document::DocumentSource;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, instrument, warn};

use crate::navigation::NavState;
use crate::processor::PageProcessor;
use crate::session::{Session, SessionSnapshot};
use crate::store::PageEntry;

/// Queue depth for pending commands.
const COMMAND_BUFFER: usize = 32;

type Reply = oneshot::Sender<Result<SessionSnapshot>>;

enum Command {
    Load {
        path: PathBuf,
        mode: LanguageMode,
        reply: Reply,
    },
    Next {
        reply: Reply,
    },
    Prev {
        reply: Reply,
    },
    Retry {
        reply: Reply,
    },
    ToggleView {
        reply: Reply,
    },
    Snapshot {
        reply: Reply,
    },
}

/// Cloneable front door to the session actor.
///
/// `load`, `next` and `prev` resolve when the page run they trigger finishes
/// (or immediately when nothing needs processing).
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Start the actor on the current Tokio runtime.
    pub fn spawn(
        source: Arc<dyn DocumentSource>,
        processor: PageProcessor,
        mode: LanguageMode,
    ) -> Self {
        let session = Session::new(mode);
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let (publisher, snapshots) = watch::channel(session.snapshot(false));

        let actor = SessionActor {
            session,
            source,
            processor,
            commands: receiver,
            publisher,
            inflight: None,
        };
        tokio::spawn(actor.run());

        Self {
            commands,
            snapshots,
        }
    }

    /// Open a new document in `mode`, replacing the current one.
    pub async fn load(&self, path: impl Into<PathBuf>, mode: LanguageMode) -> Result<SessionSnapshot> {
        let path = path.into();
        self.request(|reply| Command::Load { path, mode, reply }).await
    }

    pub async fn next(&self) -> Result<SessionSnapshot> {
        self.request(|reply| Command::Next { reply }).await
    }

    pub async fn prev(&self) -> Result<SessionSnapshot> {
        self.request(|reply| Command::Prev { reply }).await
    }

    /// Run the page under the cursor again, e.g. after a failed translation.
    pub async fn retry(&self) -> Result<SessionSnapshot> {
        self.request(|reply| Command::Retry { reply }).await
    }

    /// Flip between original and translated text.
    pub async fn toggle_view(&self) -> Result<SessionSnapshot> {
        self.request(|reply| Command::ToggleView { reply }).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Receive every state change (load, run start, publish, toggle).
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    async fn request(&self, command: impl FnOnce(Reply) -> Command) -> Result<SessionSnapshot> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| AksarError::Internal("session task has stopped".into()))?;
        response
            .await
            .map_err(|_| AksarError::Internal("session task dropped the request".into()))?
    }
}

/// The page run currently executing.
struct Inflight {
    index: usize,
    task: JoinHandle<Result<PageResult>>,
    reply: Reply,
}

enum Event {
    Command(Option<Command>),
    Finished(std::result::Result<Result<PageResult>, JoinError>),
}

struct SessionActor {
    session: Session,
    source: Arc<dyn DocumentSource>,
    processor: PageProcessor,
    commands: mpsc::Receiver<Command>,
    publisher: watch::Sender<SessionSnapshot>,
    inflight: Option<Inflight>,
}

impl SessionActor {
    async fn run(mut self) {
        debug!("session actor started");
        loop {
            let event = {
                let commands = &mut self.commands;
                let inflight = &mut self.inflight;
                tokio::select! {
                    command = commands.recv() => Event::Command(command),
                    joined = wait_for(inflight) => Event::Finished(joined),
                }
            };

            match event {
                Event::Command(Some(command)) => self.handle(command).await,
                Event::Command(None) => break,
                Event::Finished(joined) => self.finish(joined),
            }
        }

        if let Some(run) = self.inflight.take() {
            run.task.abort();
        }
        debug!("session actor stopped");
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Load { path, mode, reply } => self.load(path, mode, reply).await,
            Command::Next { reply } => {
                let entry = self.session.next();
                self.navigate(entry, reply);
            }
            Command::Prev { reply } => {
                let entry = self.session.prev();
                self.navigate(entry, reply);
            }
            Command::Retry { reply } => {
                let entry = self.session.current_page();
                self.navigate(entry, reply);
            }
            Command::ToggleView { reply } => {
                self.session.toggle_view();
                self.broadcast();
                let _ = reply.send(Ok(self.snapshot()));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(Ok(self.snapshot()));
            }
        }
    }

    #[instrument(skip_all, fields(path = %path.display(), mode = %mode))]
    async fn load(&mut self, path: PathBuf, mode: LanguageMode, reply: Reply) {
        // A file that can never load leaves the running page alone.
        if let Err(err) = DocumentKind::from_path(&path) {
            warn!(error = %err, "load rejected; keeping current document");
            let _ = reply.send(Err(err));
            return;
        }
        self.supersede();

        let source = Arc::clone(&self.source);
        let decode_path = path.clone();
        let decoded = tokio::task::spawn_blocking(move || source.load(&decode_path))
            .await
            .map_err(|err| AksarError::Internal(format!("document decoding task failed: {err}")))
            .and_then(|pages| pages);

        let pages = match decoded {
            Ok(pages) => pages,
            Err(err) => {
                warn!(error = %err, "load failed; keeping current document");
                self.broadcast();
                let _ = reply.send(Err(err));
                return;
            }
        };

        match self.session.install(path, pages, mode) {
            NavState::Empty => {
                info!("document has no pages");
                self.broadcast();
                let _ = reply.send(Ok(self.snapshot()));
            }
            NavState::AtPage(_) => {
                let entry = self.session.current_page();
                self.navigate(entry, reply);
            }
        }
    }

    /// Start a run for `entry`, or answer straight away when there is none.
    fn navigate(&mut self, entry: Option<PageEntry>, reply: Reply) {
        match entry {
            Some(entry) => {
                self.supersede();
                self.start(entry, reply);
            }
            None => {
                let _ = reply.send(Ok(self.snapshot()));
            }
        }
    }

    fn start(&mut self, entry: PageEntry, reply: Reply) {
        let processor = self.processor.clone();
        let mode = self.session.mode();
        let index = entry.index;
        debug!(page = index + 1, "page run started");

        let task = tokio::spawn(async move { processor.process_page(&entry, mode).await });
        self.inflight = Some(Inflight { index, task, reply });
        self.broadcast();
    }

    /// Abort the in-flight run, if any, and tell its caller.
    fn supersede(&mut self) {
        if let Some(run) = self.inflight.take() {
            run.task.abort();
            info!(page = run.index + 1, "page run superseded");
            let _ = run.reply.send(Err(AksarError::Superseded {
                page: run.index + 1,
            }));
        }
    }

    fn finish(&mut self, joined: std::result::Result<Result<PageResult>, JoinError>) {
        let Some(run) = self.inflight.take() else {
            return;
        };

        let outcome = match joined {
            Ok(Ok(result)) => {
                self.session.publish(result);
                Ok(())
            }
            Ok(Err(err)) => {
                warn!(error = %err, "page run failed; previous result stays current");
                Err(err)
            }
            Err(err) if err.is_cancelled() => Err(AksarError::Superseded {
                page: run.index + 1,
            }),
            Err(err) => Err(AksarError::Internal(format!(
                "page {} run panicked: {err}",
                run.index + 1
            ))),
        };

        self.broadcast();
        let _ = run.reply.send(outcome.map(|()| self.snapshot()));
    }

    fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot(self.inflight.is_some())
    }

    fn broadcast(&self) {
        self.publisher.send_replace(self.snapshot());
    }
}

/// Resolve when the in-flight run finishes; never resolves when idle.
async fn wait_for(
    inflight: &mut Option<Inflight>,
) -> std::result::Result<Result<PageResult>, JoinError> {
    match inflight {
        Some(run) => (&mut run.task).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use aksar_core::types::{Stage, TextView};
    use aksar_document::DocumentLoader;

    use super::*;
    use crate::testing::{FakeOcr, FakeSource, FakeTranslator, processor};

    struct Harness {
        handle: SessionHandle,
        ocr: Arc<FakeOcr>,
        translator: Arc<FakeTranslator>,
    }

    fn harness() -> Harness {
        let ocr = Arc::new(FakeOcr::default());
        let translator = Arc::new(FakeTranslator::default());
        let handle = SessionHandle::spawn(
            Arc::new(FakeSource),
            processor(&ocr, &translator),
            LanguageMode::Khmer,
        );
        Harness {
            handle,
            ocr,
            translator,
        }
    }

    #[tokio::test]
    async fn load_processes_first_page() {
        let h = harness();
        let snapshot = h.handle.load("five.pdf", LanguageMode::Khmer).await.unwrap();

        assert_eq!(snapshot.state, NavState::AtPage(0));
        assert_eq!(snapshot.document.as_ref().map(|doc| doc.page_count), Some(5));
        assert_eq!(snapshot.displayed_text(), Some("ទំព័រ 1"));
        assert_eq!(snapshot.page_label().as_deref(), Some("Page 1 of 5"));
        assert!(!snapshot.busy);
    }

    #[tokio::test]
    async fn empty_document_is_empty_state() {
        let h = harness();
        let snapshot = h.handle.load("empty.pdf", LanguageMode::Khmer).await.unwrap();
        assert_eq!(snapshot.state, NavState::Empty);
        assert!(snapshot.result.is_none());
        assert_eq!(h.ocr.calls.load(Ordering::SeqCst), 0);

        let after_next = h.handle.next().await.unwrap();
        assert_eq!(after_next.state, NavState::Empty);
    }

    #[tokio::test]
    async fn navigation_clamps_without_reprocessing() {
        let h = harness();
        h.handle.load("three.pdf", LanguageMode::Khmer).await.unwrap();

        let at_start = h.handle.prev().await.unwrap();
        assert_eq!(at_start.state, NavState::AtPage(0));
        assert_eq!(h.ocr.calls.load(Ordering::SeqCst), 1);

        h.handle.next().await.unwrap();
        let last = h.handle.next().await.unwrap();
        assert_eq!(last.state, NavState::AtPage(2));
        assert_eq!(last.displayed_text(), Some("ទំព័រ 3"));

        let clamped = h.handle.next().await.unwrap();
        assert_eq!(clamped.state, NavState::AtPage(2));
        assert_eq!(h.ocr.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn revisiting_a_page_reruns_ocr_but_reuses_translation() {
        let h = harness();
        h.handle.load("three.pdf", LanguageMode::Khmer).await.unwrap();
        h.handle.next().await.unwrap();
        let back = h.handle.prev().await.unwrap();

        assert_eq!(back.displayed_text(), Some("ទំព័រ 1"));
        assert_eq!(h.ocr.calls.load(Ordering::SeqCst), 3);
        assert_eq!(h.translator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn translation_failure_keeps_previous_result() {
        let h = harness();
        h.handle.load("three.pdf", LanguageMode::Khmer).await.unwrap();
        h.translator.fail.store(true, Ordering::SeqCst);

        let err = h.handle.next().await.unwrap_err();
        assert!(matches!(err, AksarError::Page { page: 2, stage: Stage::Translate, .. }));
        assert!(matches!(err.root(), AksarError::TranslationUnavailable(_)));

        let snapshot = h.handle.snapshot().await.unwrap();
        assert_eq!(snapshot.state, NavState::AtPage(1));
        assert_eq!(snapshot.result.as_ref().map(|r| r.page_index), Some(0));
        assert!(snapshot.result_is_stale());
        assert_eq!(snapshot.displayed_text(), Some("ទំព័រ 1"));
    }

    #[tokio::test]
    async fn retry_reruns_the_current_page() {
        let h = harness();
        h.handle.load("three.pdf", LanguageMode::Khmer).await.unwrap();
        h.translator.fail.store(true, Ordering::SeqCst);
        assert!(h.handle.next().await.is_err());

        h.translator.fail.store(false, Ordering::SeqCst);
        let snapshot = h.handle.retry().await.unwrap();
        assert_eq!(snapshot.state, NavState::AtPage(1));
        assert_eq!(snapshot.displayed_text(), Some("ទំព័រ 2"));
        assert!(!snapshot.result_is_stale());
    }

    #[tokio::test]
    async fn newer_navigation_supersedes_running_page() {
        let h = harness();
        h.handle.load("five.pdf", LanguageMode::Khmer).await.unwrap();
        h.ocr.set_delay(Duration::from_millis(300));

        let slow = h.handle.clone();
        let first = tokio::spawn(async move { slow.next().await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = h.handle.next().await.unwrap();

        let first = first.await.unwrap();
        assert!(matches!(first, Err(AksarError::Superseded { page: 2 })));
        assert_eq!(second.state, NavState::AtPage(2));
        assert_eq!(second.displayed_text(), Some("ទំព័រ 3"));
    }

    #[tokio::test]
    async fn failed_load_leaves_document_untouched() {
        let h = harness();
        let before = h.handle.load("three.pdf", LanguageMode::Khmer).await.unwrap();

        let err = h.handle.load("broken.png", LanguageMode::English).await.unwrap_err();
        assert!(matches!(err, AksarError::DecodeError(_)));

        let after = h.handle.snapshot().await.unwrap();
        assert_eq!(after.document, before.document);
        assert_eq!(after.mode, LanguageMode::Khmer);
        assert_eq!(after.result, before.result);
    }

    #[tokio::test]
    async fn unsupported_file_is_rejected() {
        let ocr = Arc::new(FakeOcr::default());
        let translator = Arc::new(FakeTranslator::default());
        let handle = SessionHandle::spawn(
            Arc::new(DocumentLoader::default()),
            processor(&ocr, &translator),
            LanguageMode::Khmer,
        );
        assert!(matches!(
            handle.load("notes.docx", LanguageMode::Khmer).await,
            Err(AksarError::UnsupportedFormat(_))
        ));
    }

    #[tokio::test]
    async fn unsupported_load_does_not_interrupt_running_page() {
        let h = harness();
        h.handle.load("five.pdf", LanguageMode::Khmer).await.unwrap();
        h.ocr.set_delay(Duration::from_millis(200));

        let running = h.handle.clone();
        let next = tokio::spawn(async move { running.next().await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = h.handle.load("scan.pdx", LanguageMode::Khmer).await.unwrap_err();
        assert!(matches!(err, AksarError::UnsupportedFormat(_)));

        let finished = next.await.unwrap().unwrap();
        assert_eq!(finished.state, NavState::AtPage(1));
        assert_eq!(finished.displayed_text(), Some("ទំព័រ 2"));
        assert_eq!(finished.document.map(|doc| doc.page_count), Some(5));
    }

    #[tokio::test]
    async fn toggle_view_flips_displayed_text() {
        let h = harness();
        h.handle.load("scan.png", LanguageMode::English).await.unwrap();

        let translated = h.handle.toggle_view().await.unwrap();
        assert_eq!(translated.view, TextView::Translated);
        assert_eq!(translated.displayed_text(), Some("[en->km] ទំព័រ 1   \n"));

        let original = h.handle.toggle_view().await.unwrap();
        assert_eq!(original.displayed_text(), Some("ទំព័រ 1   \n"));
    }

    #[tokio::test]
    async fn subscribers_see_published_results() {
        let h = harness();
        let mut updates = h.handle.subscribe();
        h.handle.load("scan.png", LanguageMode::Khmer).await.unwrap();

        updates.changed().await.unwrap();
        let latest = updates.borrow_and_update().clone();
        assert_eq!(latest.displayed_text(), Some("ទំព័រ 1"));
        assert!(!latest.busy);
    }
}
