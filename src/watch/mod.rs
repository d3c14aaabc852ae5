//! Content directory watcher.
//!
//! ```text
//! EventSource ─► filter (writes, extension, no editor noise) ─► settle ─► on_change
//! ```
//!
//! The loop is sequential: it does not take the next event until
//! `on_change` (build, then broadcast) returns.

mod filter;
mod source;
pub mod types;

#[cfg(test)]
mod tests;

use std::time::{Duration, Instant};

use crossbeam::channel::{RecvTimeoutError, select};

pub use filter::qualifies;
pub use source::{EventSource, NotifySource};
pub use types::WatchEvent;

use crate::{debug, log};

/// How often an idle loop checks for shutdown.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Longest a burst can postpone its build.
const MAX_SETTLE: Duration = Duration::from_secs(2);

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchExit {
    Shutdown,
    /// The event or error stream closed.
    SourceClosed,
}

pub struct WatchLoop<'a, S: EventSource> {
    source: &'a S,
    extension: &'a str,
    /// Quiet period that ends a burst.
    settle: Duration,
}

impl<'a, S: EventSource> WatchLoop<'a, S> {
    pub fn new(source: &'a S, extension: &'a str, settle: Duration) -> Self {
        Self {
            source,
            extension,
            settle,
        }
    }

    /// Block until shutdown or until the source closes, calling `on_change`
    /// once per burst of qualifying events.
    ///
    /// Watcher errors are logged and never end the loop.
    pub fn run(
        &self,
        is_shutdown: impl Fn() -> bool,
        mut on_change: impl FnMut(&[WatchEvent]),
    ) -> WatchExit {
        loop {
            if is_shutdown() {
                return WatchExit::Shutdown;
            }

            select! {
                recv(self.source.events()) -> msg => {
                    let Ok(event) = msg else {
                        return WatchExit::SourceClosed;
                    };
                    if !qualifies(&event, self.extension) {
                        debug!("watch"; "ignored {} {}", event.kind.label(), event.path.display());
                        continue;
                    }

                    let (batch, open) = self.settle(event);
                    on_change(&batch);
                    if !open {
                        return WatchExit::SourceClosed;
                    }
                }
                recv(self.source.errors()) -> msg => match msg {
                    Ok(e) => log!("watch"; "watcher error: {}", e),
                    Err(_) => return WatchExit::SourceClosed,
                },
                default(IDLE_POLL) => {}
            }
        }
    }

    /// Collect qualifying events until the stream stays quiet for `settle`.
    ///
    /// Returns the batch (one entry per path, latest kind) and whether the
    /// stream is still open.
    fn settle(&self, first: WatchEvent) -> (Vec<WatchEvent>, bool) {
        let started = Instant::now();
        let mut batch = vec![first];

        loop {
            let budget = MAX_SETTLE.saturating_sub(started.elapsed());
            if budget.is_zero() {
                return (batch, true);
            }

            match self.source.events().recv_timeout(self.settle.min(budget)) {
                Ok(event) if qualifies(&event, self.extension) => {
                    match batch.iter_mut().find(|e| e.path == event.path) {
                        Some(existing) => existing.kind = event.kind,
                        None => batch.push(event),
                    }
                }
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) => return (batch, true),
                Err(RecvTimeoutError::Disconnected) => return (batch, false),
            }
        }
    }
}
