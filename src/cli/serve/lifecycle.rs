//! Server lifecycle management.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;
use tiny_http::Server;

use super::ServeContext;
use crate::core::is_shutdown;
use crate::watch::{NotifySource, WatchLoop};
use crate::{debug, log};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {interface} after {attempts} attempts (ports {first}-{last}): {message}")]
    Bind {
        interface: IpAddr,
        attempts: u16,
        first: u16,
        last: u16,
        message: String,
    },
}

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr), ServeError> {
    let mut offset = 0;
    loop {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < MAX_PORT_RETRIES => offset += 1,
            Err(e) => {
                return Err(ServeError::Bind {
                    interface,
                    attempts: MAX_PORT_RETRIES,
                    first: base_port,
                    last: port,
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Start the content watcher thread, or `None` when watching is off or the
/// directory cannot be watched.
pub fn spawn_watcher(ctx: Arc<ServeContext>) -> Option<JoinHandle<()>> {
    let serve = &ctx.config.serve;
    if !serve.watch {
        return None;
    }

    let content = &ctx.config.build.content;
    let source = if serve.poll {
        NotifySource::polling(content, Duration::from_millis(serve.poll_interval_ms))
    } else {
        NotifySource::native(content)
    };
    let source = match source {
        Ok(source) => source,
        Err(e) => {
            log!("watch"; "cannot watch {}: {}", ctx.config.root_relative(content).display(), e);
            return None;
        }
    };
    log!("watch"; "watching {}", ctx.config.root_relative(content).display());

    Some(thread::spawn(move || {
        let settle = Duration::from_millis(ctx.config.serve.debounce_ms);
        let watcher = WatchLoop::new(&source, &ctx.config.build.extension, settle);
        let exit = watcher.run(is_shutdown, |batch| ctx.rebuild(batch));
        debug!("watch"; "stopped: {:?}", exit);
    }))
}

/// Wait for the watcher to finish its current build (max 2 seconds).
pub fn wait_for_shutdown(handle: Option<JoinHandle<()>>) {
    let Some(handle) = handle else { return };

    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
    debug!("watch"; "still building, not waiting");
}
