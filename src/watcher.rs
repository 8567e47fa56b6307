//! Config file watcher.
//!
//! Watches the directory holding the config file (editors and the game often
//! replace the file through a rename) and emits one [`ConfigChanged`] per
//! burst of events. Events that arrive shortly after the editor's own save
//! are dropped so the application does not react to its own writes.
//!
//! The watcher never reads or writes configuration state; consumers are
//! expected to call `reload` and/or `compute_diff` when notified.

use crate::constants::{DEFAULT_DEBOUNCE_MS, DEFAULT_INTERNAL_WINDOW_MS};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Notification that the watched config file changed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChanged {
    /// Path of the changed file
    pub path: PathBuf,
}

/// Timing knobs for [`ConfigWatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Events closer than this to the last notification are dropped
    pub debounce: Duration,
    /// How long after [`InternalChanges::mark`] events are ignored
    pub internal_window: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            internal_window: Duration::from_millis(DEFAULT_INTERNAL_WINDOW_MS),
        }
    }
}

/// Leading-edge debounce: the first event of a burst passes, the rest of
/// the burst is swallowed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    /// Creates a debouncer with the given window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Returns true if an event at `now` should be forwarded.
    pub fn should_emit(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }
        self.last = Some(now);
        true
    }
}

/// Shared marker for writes made by this application.
///
/// Clones share state: the editor marks, the watcher checks.
#[derive(Debug, Clone)]
pub struct InternalChanges {
    window: Duration,
    until: Arc<Mutex<Option<Instant>>>,
}

impl InternalChanges {
    /// Creates a marker whose suppression lasts `window` after each mark.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            until: Arc::new(Mutex::new(None)),
        }
    }

    /// Records that the application is about to write the file.
    pub fn mark(&self) {
        self.mark_at(Instant::now());
    }

    /// [`mark`](Self::mark) with an explicit clock.
    pub fn mark_at(&self, now: Instant) {
        let mut until = self.until.lock().unwrap_or_else(PoisonError::into_inner);
        *until = Some(now + self.window);
    }

    /// True while events should be attributed to our own write.
    #[must_use]
    pub fn is_suppressed(&self, now: Instant) -> bool {
        let until = self.until.lock().unwrap_or_else(PoisonError::into_inner);
        until.is_some_and(|until| now < until)
    }
}

impl Default for InternalChanges {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_INTERNAL_WINDOW_MS))
    }
}

/// A running watcher for a single config file. Dropping it stops watching.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
    internal: InternalChanges,
}

impl ConfigWatcher {
    /// Starts watching `path`.
    ///
    /// Returns the watcher and the receiving end of the notification channel.
    pub fn start(
        path: &Path,
        options: WatchOptions,
    ) -> Result<(Self, mpsc::Receiver<ConfigChanged>), notify::Error> {
        let (tx, rx) = mpsc::channel();
        let target = absolute_target(path);
        let watch_dir = target
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let internal = InternalChanges::new(options.internal_window);
        let suppress = internal.clone();
        let mut debouncer = Debouncer::new(options.debounce);
        let event_target = target.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !is_relevant(&event, &event_target) {
                    return;
                }
                let now = Instant::now();
                if suppress.is_suppressed(now) {
                    debug!(kind = ?event.kind, "Ignoring internal config change");
                    return;
                }
                if !debouncer.should_emit(now) {
                    return;
                }
                info!(path = %event_target.display(), kind = ?event.kind, "Config file changed");
                // The receiver going away just means nobody listens any more.
                let _ = tx.send(ConfigChanged {
                    path: event_target.clone(),
                });
            }
            Err(e) => error!("Watch error: {:?}", e),
        })?;

        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;
        info!(path = %target.display(), debounce_ms = options.debounce.as_millis(), "Config watcher started");

        Ok((
            Self {
                _watcher: watcher,
                path: target,
                internal,
            },
            rx,
        ))
    }

    /// The watched file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Handle to mark internal writes; hand it to the editor.
    #[must_use]
    pub fn internal_changes(&self) -> InternalChanges {
        self.internal.clone()
    }
}

/// Write, create, rename and attribute events on the target file.
fn is_relevant(event: &Event, target: &Path) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event.paths.iter().any(|p| p == target)
}

/// Resolves the directory part so it matches the absolute paths notify reports.
fn absolute_target(path: &Path) -> PathBuf {
    let file_name = path.file_name().map(Path::new).unwrap_or(path);
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    match dir.canonicalize() {
        Ok(dir) => dir.join(file_name),
        Err(_) => path.to_path_buf(),
    }
}
