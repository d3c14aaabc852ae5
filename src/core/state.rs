//! Process-wide shutdown state.
//!
//! Ctrl+C sets `SHUTDOWN`. Once a server is registered the handler also
//! unblocks it, so the request loop, the watcher loop and every live
//! reload session wind down and the cache gets saved. Before that the
//! process simply exits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use anyhow::Context;
use tiny_http::Server;

/// Exit status after an interrupt with nothing to wind down.
const INTERRUPTED_EXIT: i32 = 130;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Set once `serve` has bound; Ctrl+C unblocks it.
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Install the Ctrl+C handler. Must run before anything blocks.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        request_shutdown();

        if let Some(server) = SERVER.get() {
            crate::log!("serve"; "stopping, saving cache");
            server.unblock();
        } else {
            std::process::exit(INTERRUPTED_EXIT);
        }
    })
    .context("cannot install Ctrl+C handler")
}

/// Make Ctrl+C stop `server` instead of exiting the process.
pub fn register_server(server: Arc<Server>) {
    let _ = SERVER.set(server);
}

pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

/// Relaxed: a loop may run one extra iteration before it notices.
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
