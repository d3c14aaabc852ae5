//! Registry of live reload sessions with non-blocking fan-out.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam::channel::{Receiver, Sender, TrySendError, bounded};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Connected browser sessions, each behind a capacity-1 channel.
///
/// The lock is held for one register, deregister or broadcast call and
/// never across a blocking send.
#[derive(Default)]
pub struct LiveReload {
    sessions: Mutex<FxHashMap<SessionId, Sender<()>>>,
    next_id: AtomicU64,
}

impl LiveReload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh, never reused id.
    pub fn next_id(&self) -> SessionId {
        SessionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Add a session. Registering an existing id replaces its channel.
    pub fn register(&self, id: SessionId) -> Receiver<()> {
        let (tx, rx) = bounded(1);
        self.sessions.lock().insert(id, tx);
        debug!("reload"; "session {} connected", id);
        rx
    }

    /// Returns whether the session was registered.
    pub fn deregister(&self, id: SessionId) -> bool {
        let removed = self.sessions.lock().remove(&id).is_some();
        if removed {
            debug!("reload"; "session {} closed", id);
        }
        removed
    }

    /// Notify every session without blocking.
    ///
    /// A session whose channel is still full from the previous notification,
    /// or whose receiver is gone, is dropped from the registry. Returns the
    /// number of sessions notified.
    pub fn broadcast(&self) -> usize {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();

        sessions.retain(|id, tx| match tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) => {
                debug!("reload"; "session {} not draining, dropped", id);
                false
            }
            Err(TrySendError::Disconnected(())) => {
                debug!("reload"; "session {} gone, dropped", id);
                false
            }
        });

        let delivered = sessions.len();
        debug!("reload"; "broadcast to {} of {} sessions", delivered, before);
        delivered
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}
