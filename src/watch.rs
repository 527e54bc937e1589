//! Watching a note file for edits.
//!
//! Uses `notify` to watch the note's directory (editors often save by
//! replacing the file, which a watch on the file itself would miss) and
//! forwards raw events over a `flume` channel. Bursts of events from a
//! single save are coalesced into one change.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Quiet period that ends a burst of events.
const SETTLE: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchEvent {
    /// The note was written, created or replaced.
    Changed,
    /// Nothing happened before the timeout.
    TimedOut,
    /// The watcher stopped delivering events.
    Closed,
}

pub struct NoteWatcher {
    _watcher: RecommendedWatcher,
    rx: flume::Receiver<notify::Result<Event>>,
    path: PathBuf,
}

impl NoteWatcher {
    pub fn new(path: &Path) -> Result<Self, notify::Error> {
        let path = path.canonicalize()?;
        let dir = path.parent().unwrap_or(Path::new("/")).to_path_buf();

        let (tx, rx) = flume::unbounded();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // The receiver only goes away on shutdown.
            let _ = tx.send(res);
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!("Watching {} for changes", path.display());

        Ok(Self {
            _watcher: watcher,
            rx,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the note changes, the timeout passes, or the watcher closes.
    pub fn wait(&self, timeout: Option<Duration>) -> WatchEvent {
        let deadline = timeout.map(|t| Instant::now() + t);

        loop {
            let received = match deadline {
                Some(deadline) => self.rx.recv_deadline(deadline).map_err(|e| match e {
                    flume::RecvTimeoutError::Timeout => WatchEvent::TimedOut,
                    flume::RecvTimeoutError::Disconnected => WatchEvent::Closed,
                }),
                None => self.rx.recv().map_err(|_| WatchEvent::Closed),
            };

            match received {
                Ok(Ok(event)) if self.concerns_note(&event) => {
                    while self.rx.recv_timeout(SETTLE).is_ok() {}
                    tracing::debug!("Note changed: {:?}", event.kind);
                    return WatchEvent::Changed;
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => tracing::warn!("File watcher error: {:?}", e),
                Err(outcome) => return outcome,
            }
        }
    }

    fn concerns_note(&self, event: &Event) -> bool {
        matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
            && event
                .paths
                .iter()
                .any(|p| p.file_name() == self.path.file_name())
    }
}
