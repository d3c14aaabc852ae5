//! Development server with live reload support.
//!
//! ```text
//! main thread      initial build ─► bind ─► request loop ─► save cache
//! watcher thread   WatchLoop ─► BuildGate ─► build_site ─► LiveReload::broadcast
//! session threads  one per /_livereload stream
//! request pool     static files from the output directory
//! ```

mod lifecycle;
mod path;
mod response;

#[cfg(test)]
mod tests;

pub use lifecycle::ServeError;

use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use tiny_http::{Request, Server};

use crate::build::{self, BuildGate, BuildOptions, BuildReport};
use crate::config::SiteConfig;
use crate::core::{is_shutdown, register_server, request_shutdown};
use crate::embed::serve::LIVERELOAD_ENDPOINT;
use crate::freshness::BuildCache;
use crate::logger::{status_error, status_success, status_unchanged};
use crate::reload::{LiveReload, Session};
use crate::utils::plural_count;
use crate::watch::WatchEvent;
use crate::{debug, log};

/// Threads serving static files.
const REQUEST_THREADS: usize = 4;

/// State shared by the watcher, the request pool and live reload sessions.
pub struct ServeContext {
    pub config: SiteConfig,
    pub cache: BuildCache,
    pub hub: LiveReload,
    gate: BuildGate,
}

impl ServeContext {
    pub fn new(config: SiteConfig) -> Self {
        let cache = build::open_cache(&config);
        Self {
            config,
            cache,
            hub: LiveReload::new(),
            gate: BuildGate::new(),
        }
    }

    /// Build with the command-line switches, logging the outcome.
    ///
    /// A failed first build is not fatal: the server still starts and the
    /// next change retries.
    pub fn initial_build(&self) {
        match build::build_site(&self.config, &self.cache, BuildOptions::from_config(&self.config)) {
            Ok(report) => log!("build"; "{}", report.summary()),
            Err(e) => log!("build"; "initial build failed: {}", e.describe()),
        }
    }

    /// React to one settled burst of content changes: build, then tell every
    /// connected browser to reload if the build succeeded.
    pub fn rebuild(&self, batch: &[WatchEvent]) {
        for event in batch {
            debug!("watch"; "{} {}", event.kind.label(), self.config.root_relative(&event.path).display());
        }

        let Some(result) = self.gate.run(|| {
            build::build_site(&self.config, &self.cache, BuildOptions::default())
        }) else {
            debug!("watch"; "build already running, queued");
            return;
        };

        match result {
            Ok(report) if report.is_success() => {
                if report.is_noop() {
                    status_unchanged(&report.summary());
                } else {
                    status_success(&report.summary());
                }
                let notified = self.hub.broadcast();
                debug!("reload"; "notified {}", plural_count(notified, "client"));
            }
            Ok(report) => status_error(&report.summary(), &failure_detail(&self.config, &report)),
            Err(e) => status_error("build failed", &e.describe()),
        }
    }

    pub fn save_cache(&self) {
        match build::save_cache(&self.cache) {
            Ok(()) => debug!("cache"; "saved {}", plural_count(self.cache.len(), "fingerprint")),
            Err(e) => log!("cache"; "{}", e.describe()),
        }
    }
}

/// `quire serve`: build once, then watch, rebuild and serve until Ctrl+C.
pub fn serve_site(config: SiteConfig) -> Result<()> {
    let ctx = Arc::new(ServeContext::new(config));
    ctx.initial_build();

    let (server, addr) = lifecycle::bind_with_retry(ctx.config.serve.interface, ctx.config.serve.port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server));
    log!("serve"; "http://{}", addr);

    let watcher = lifecycle::spawn_watcher(Arc::clone(&ctx));
    let served = run_request_loop(&server, &ctx);

    request_shutdown();
    lifecycle::wait_for_shutdown(watcher);
    ctx.save_cache();
    served
}

fn run_request_loop(server: &Server, ctx: &Arc<ServeContext>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        if is_livereload(&request) && !is_shutdown() {
            spawn_session(request, Arc::clone(ctx));
            continue;
        }

        let ctx = Arc::clone(ctx);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &ctx.config) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

fn is_livereload(request: &Request) -> bool {
    path::request_path(request.url()) == LIVERELOAD_ENDPOINT
}

/// Hand the connection to a live reload session on its own thread.
fn spawn_session(request: Request, ctx: Arc<ServeContext>) {
    thread::spawn(move || {
        let mut session = Session::open(&ctx.hub, request.into_writer());
        debug!("reload"; "client {} connected", session.id());
        session.run(is_shutdown);
        debug!("reload"; "client {} gone", session.id());
    });
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &SiteConfig) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    match path::resolve_path(request.url(), &config.build.output) {
        Some(path) => response::respond_file(request, &path),
        None => response::respond_not_found(request, config),
    }
}

/// One line per failed file, root-relative.
fn failure_detail(config: &SiteConfig, report: &BuildReport) -> String {
    report
        .failed
        .iter()
        .map(|(path, reason)| format!("{}: {}", config.root_relative(path).display(), reason))
        .collect::<Vec<_>>()
        .join("\n")
}
