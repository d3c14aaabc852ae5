//! One Server-Sent Events stream per browser tab.
//!
//! ```text
//! open ──► Connected ──(write error | channel closed | shutdown)──► Closed
//!              │  ▲
//!              └──┘ reload event / heartbeat
//! ```
//!
//! Leaving `Connected` always deregisters the session.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossbeam::channel::{Receiver, RecvTimeoutError};

use super::{LiveReload, SessionId};

/// Raw response head; the body is the event stream.
pub const SSE_HEADER: &str = "HTTP/1.1 200 OK\r\n\
    Content-Type: text/event-stream\r\n\
    Cache-Control: no-cache\r\n\
    Connection: keep-alive\r\n\
    Access-Control-Allow-Origin: *\r\n\
    \r\n";

/// Reconnect delay hint for `EventSource`, sent once.
const RETRY_HINT: &[u8] = b"retry: 1000\n\n";

/// The only event on the stream.
pub const RELOAD_EVENT: &[u8] = b"event: reload\ndata: reload\n\n";

/// Comment line; keeps proxies open and surfaces dead peers as write errors.
pub const HEARTBEAT: &[u8] = b": ping\n\n";

pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// How often the loop checks for shutdown while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Closed,
}

pub struct Session<'a, W: Write> {
    id: SessionId,
    hub: &'a LiveReload,
    rx: Receiver<()>,
    writer: W,
    state: SessionState,
    heartbeat: Duration,
}

impl<'a, W: Write> Session<'a, W> {
    /// Register with `hub` and send the response head.
    pub fn open(hub: &'a LiveReload, writer: W) -> Self {
        let id = hub.next_id();
        let rx = hub.register(id);
        let mut session = Self {
            id,
            hub,
            rx,
            writer,
            state: SessionState::Connected,
            heartbeat: HEARTBEAT_INTERVAL,
        };
        let head = [SSE_HEADER.as_bytes(), RETRY_HINT].concat();
        if session.send(&head).is_err() {
            session.close();
        }
        session
    }

    pub fn with_heartbeat(mut self, interval: Duration) -> Self {
        self.heartbeat = interval;
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Forward notifications until the client goes away, the registry drops
    /// the session, or `is_shutdown` turns true.
    pub fn run(&mut self, is_shutdown: impl Fn() -> bool) {
        let mut last_write = Instant::now();

        while self.state == SessionState::Connected {
            if is_shutdown() {
                break;
            }

            let frame = match self.rx.recv_timeout(POLL_INTERVAL.min(self.heartbeat)) {
                Ok(()) => RELOAD_EVENT,
                Err(RecvTimeoutError::Timeout) if last_write.elapsed() >= self.heartbeat => {
                    HEARTBEAT
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };

            if self.send(frame).is_err() {
                break;
            }
            last_write = Instant::now();
        }

        self.close();
    }

    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.flush()
    }

    /// Idempotent.
    fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.state = SessionState::Closed;
        self.hub.deregister(self.id);
    }
}

impl<W: Write> Drop for Session<'_, W> {
    fn drop(&mut self) {
        self.close();
    }
}
