//! Settings file watcher.
//!
//! Watches `settings.yaml` and reports debounced change notifications so a
//! running engine can swap in a freshly loaded snapshot.
//!
//! Debouncing is trailing-edge: a change is reported once the file has been
//! quiet for the debounce delay, so a burst of saves ends in one reload of
//! the last version.

use crate::{Platform, Settings};
use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

const POLL_INTERVAL_MS: u64 = 500;

/// The settings file changed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChanged {
    pub path: PathBuf,
}

/// Holds back a change until no further event arrived for `delay`.
#[derive(Debug)]
struct Debouncer {
    delay: Duration,
    /// Time of the latest event not yet reported.
    pending: Mutex<Option<Instant>>,
}

impl Debouncer {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Note an event; a later one restarts the window.
    fn record(&self, at: Instant) {
        let mut pending = self.pending.lock();
        *pending = Some(pending.map_or(at, |previous| previous.max(at)));
    }

    /// True once, after the window following the latest event has closed.
    fn take_ready(&self, now: Instant) -> bool {
        let mut pending = self.pending.lock();
        match *pending {
            Some(at) if now.saturating_duration_since(at) >= self.delay => {
                *pending = None;
                true
            }
            _ => false,
        }
    }
}

/// Shared filter for both watcher backends.
fn event_handler(
    filename: OsString,
    tx: Sender<Instant>,
) -> impl Fn(notify::Result<Event>) + Send + 'static {
    move |result| {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Settings watcher error: {}", e);
                return;
            }
        };

        // Create covers editors and our own save that rename over the file.
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return;
        }
        if !event
            .paths
            .iter()
            .any(|p| p.file_name().is_some_and(|f| f == filename))
        {
            return;
        }
        log::trace!("Settings change noted: {:?}", event.kind);
        if let Err(e) = tx.send(Instant::now()) {
            log::error!("Failed to deliver settings change: {}", e);
        }
    }
}

/// Watches one settings file.
pub struct SettingsWatcher {
    path: PathBuf,
    _watcher: Box<dyn Watcher + Send>,
    events: Receiver<Instant>,
    debouncer: Debouncer,
}

impl std::fmt::Debug for SettingsWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsWatcher")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SettingsWatcher {
    /// Start watching `settings_path`.
    ///
    /// Uses the native backend when available and falls back to polling
    /// (e.g. inside containers or on network filesystems).
    ///
    /// # Errors
    /// Fails if the file does not exist or neither backend can watch it.
    pub fn new(settings_path: &Path, debounce_ms: u64) -> Result<Self> {
        if !settings_path.exists() {
            anyhow::bail!("Settings file not found: {}", settings_path.display());
        }

        let path = settings_path
            .canonicalize()
            .unwrap_or_else(|_| settings_path.to_path_buf());
        let filename = path
            .file_name()
            .context("Settings path has no filename")?
            .to_os_string();
        let parent = path
            .parent()
            .context("Settings path has no parent directory")?
            .to_path_buf();

        let (tx, rx) = channel();
        let native = notify::recommended_watcher(event_handler(filename.clone(), tx.clone()));
        let mut watcher: Box<dyn Watcher + Send> = match native {
            Ok(w) => {
                log::debug!("Settings watcher: using native backend");
                Box::new(w)
            }
            Err(e) => {
                log::warn!(
                    "Settings watcher: native backend unavailable ({}); polling instead",
                    e
                );
                Box::new(
                    PollWatcher::new(
                        event_handler(filename, tx),
                        NotifyConfig::default()
                            .with_poll_interval(Duration::from_millis(POLL_INTERVAL_MS)),
                    )
                    .context("Failed to create polling settings watcher")?,
                )
            }
        };

        watcher
            .watch(&parent, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", parent.display()))?;
        log::info!("Watching settings file {}", path.display());

        Ok(Self {
            path,
            _watcher: watcher,
            events: rx,
            debouncer: Debouncer::new(Duration::from_millis(debounce_ms)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A change whose debounce window has closed, without blocking.
    ///
    /// Call this periodically; a burst of events is reported once.
    pub fn try_recv(&self) -> Option<SettingsChanged> {
        self.poll(Instant::now())
    }

    fn poll(&self, now: Instant) -> Option<SettingsChanged> {
        while let Ok(at) = self.events.try_recv() {
            self.debouncer.record(at);
        }
        if !self.debouncer.take_ready(now) {
            return None;
        }
        log::info!("Settings file changed: {}", self.path.display());
        Some(SettingsChanged {
            path: self.path.clone(),
        })
    }

    /// Reload once the pending change has settled.
    ///
    /// A file that fails to parse is logged and skipped so the caller keeps
    /// its current snapshot.
    pub fn reload_if_changed(&self, platform: Platform) -> Option<Settings> {
        self.try_recv()?;

        match Settings::load_from(&self.path, platform) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::error!("Failed to reload settings: {:#}", e);
                None
            }
        }
    }
}
