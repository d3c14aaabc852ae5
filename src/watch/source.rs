//! Filesystem event sources.
//!
//! Native notifications and polling share one shape: an unbounded stream of
//! [`WatchEvent`]s plus a separate stream of watcher errors.

use std::path::Path;
use std::time::Duration;

use crossbeam::channel::{Receiver, Sender, unbounded};
use notify::{Config, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};

use super::types::WatchEvent;

pub trait EventSource {
    fn events(&self) -> &Receiver<WatchEvent>;
    fn errors(&self) -> &Receiver<notify::Error>;
}

/// notify-backed source watching one directory, non-recursively.
pub struct NotifySource {
    /// Dropping the watcher closes both streams.
    _watcher: Box<dyn Watcher + Send>,
    events: Receiver<WatchEvent>,
    errors: Receiver<notify::Error>,
}

impl NotifySource {
    /// Platform watcher (inotify, FSEvents, kqueue, ReadDirectoryChanges).
    pub fn native(dir: &Path) -> notify::Result<Self> {
        let (handler, events, errors) = channels();
        let watcher = RecommendedWatcher::new(handler, Config::default())?;
        Self::attach(Box::new(watcher), dir, events, errors)
    }

    /// Stat-polling watcher for network mounts and containers.
    pub fn polling(dir: &Path, interval: Duration) -> notify::Result<Self> {
        let (handler, events, errors) = channels();
        let config = Config::default()
            .with_poll_interval(interval)
            .with_compare_contents(false);
        let watcher = PollWatcher::new(handler, config)?;
        Self::attach(Box::new(watcher), dir, events, errors)
    }

    fn attach(
        mut watcher: Box<dyn Watcher + Send>,
        dir: &Path,
        events: Receiver<WatchEvent>,
        errors: Receiver<notify::Error>,
    ) -> notify::Result<Self> {
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(Self {
            _watcher: watcher,
            events,
            errors,
        })
    }
}

impl EventSource for NotifySource {
    fn events(&self) -> &Receiver<WatchEvent> {
        &self.events
    }

    fn errors(&self) -> &Receiver<notify::Error> {
        &self.errors
    }
}

type Handler = Box<dyn FnMut(notify::Result<notify::Event>) + Send>;

fn channels() -> (Handler, Receiver<WatchEvent>, Receiver<notify::Error>) {
    let (event_tx, event_rx) = unbounded();
    let (error_tx, error_rx) = unbounded();
    (forward(event_tx, error_tx), event_rx, error_rx)
}

/// notify callback: split events per path, route errors separately.
fn forward(events: Sender<WatchEvent>, errors: Sender<notify::Error>) -> Handler {
    Box::new(move |result| match result {
        Ok(event) => {
            for change in WatchEvent::from_notify(&event) {
                // receiver gone means the loop has stopped
                let _ = events.send(change);
            }
        }
        Err(e) => {
            let _ = errors.send(e);
        }
    })
}
