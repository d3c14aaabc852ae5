use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tiny_http::Server;

use super::*;
use crate::config::test_site_config;
use crate::reload::session::RELOAD_EVENT;
use crate::watch::types::ChangeKind;

struct Running {
    _temp: TempDir,
    ctx: Arc<ServeContext>,
    server: Arc<Server>,
    addr: SocketAddr,
    handle: Option<JoinHandle<()>>,
}

impl Running {
    fn start(files: &[(&str, &str)]) -> Self {
        let temp = TempDir::new().unwrap();
        let config = test_site_config(temp.path());
        fs::create_dir_all(&config.build.content).unwrap();
        for (name, body) in files {
            fs::write(config.build.content.join(name), body).unwrap();
        }

        let ctx = Arc::new(ServeContext::new(config));
        ctx.initial_build();

        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let handle = {
            let server = Arc::clone(&server);
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || run_request_loop(&server, &ctx).unwrap())
        };

        Self {
            _temp: temp,
            ctx,
            server,
            addr,
            handle: Some(handle),
        }
    }

    fn connect(&self) -> TcpStream {
        let stream = TcpStream::connect(self.addr).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        stream
    }

    fn get(&self, method: &str, path: &str) -> String {
        let mut stream = self.connect();
        write!(
            stream,
            "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
        )
        .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    fn wait_for_sessions(&self, count: usize) {
        let started = Instant::now();
        while self.ctx.hub.len() != count {
            assert!(started.elapsed() < Duration::from_secs(5), "sessions never reached {count}");
            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
    }
}

/// Read from `stream` until `needle` shows up.
fn read_until(stream: &mut TcpStream, needle: &[u8]) -> Vec<u8> {
    let mut seen = Vec::new();
    let mut buf = [0u8; 512];
    while !seen.windows(needle.len()).any(|w| w == needle) {
        let n = stream.read(&mut buf).unwrap();
        assert!(n > 0, "stream closed before {:?}", String::from_utf8_lossy(needle));
        seen.extend_from_slice(&buf[..n]);
    }
    seen
}

fn open_stream(running: &Running) -> TcpStream {
    let mut stream = running.connect();
    stream
        .write_all(b"GET /_livereload HTTP/1.1\r\nHost: localhost\r\nAccept: text/event-stream\r\n\r\n")
        .unwrap();
    let head = read_until(&mut stream, b"retry: 1000\n\n");
    let head = String::from_utf8_lossy(&head);
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert!(head.contains("Content-Type: text/event-stream"));
    stream
}

#[test]
fn test_serves_built_page() {
    let running = Running::start(&[("hello.md", "---\ntitle: Hello\n---\n# Hi\n")]);

    let response = running.get("GET", "/hello.html");
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("text/html"));
    assert!(response.contains("<h1>Hi</h1>"));
    assert!(response.contains("/_livereload"));

    assert!(running.get("GET", "/hello").contains("<h1>Hi</h1>"));
}

#[test]
fn test_head_has_no_body() {
    let running = Running::start(&[("hello.md", "# Hi")]);
    let response = running.get("HEAD", "/hello.html");
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(!response.contains("<h1>"));
}

#[test]
fn test_not_found_page_reloads() {
    let running = Running::start(&[]);
    let response = running.get("GET", "/later.html");
    assert!(response.starts_with("HTTP/1.1 404"));
    assert!(response.contains("/later.html"));
    assert!(response.contains("EventSource"));
}

#[test]
fn test_traversal_is_not_found() {
    let running = Running::start(&[("a.md", "a")]);
    assert!(running.get("GET", "/../quire.toml").starts_with("HTTP/1.1 404"));
}

#[test]
fn test_change_rebuilds_and_notifies() {
    let running = Running::start(&[("post.md", "first")]);
    let mut stream = open_stream(&running);
    running.wait_for_sessions(1);

    let source = running.ctx.config.build.content.join("post.md");
    fs::write(&source, "second").unwrap();
    running
        .ctx
        .rebuild(&[WatchEvent::new(&source, ChangeKind::Modified)]);

    read_until(&mut stream, RELOAD_EVENT);
    assert!(running.get("GET", "/post.html").contains("second"));
}

#[test]
fn test_failed_rebuild_does_not_notify() {
    let running = Running::start(&[("post.md", "fine")]);
    let mut stream = open_stream(&running);
    running.wait_for_sessions(1);
    stream
        .set_read_timeout(Some(Duration::from_millis(300)))
        .unwrap();

    let source = running.ctx.config.build.content.join("post.md");
    fs::write(&source, [0xff, 0xfe, 0x00]).unwrap();
    running
        .ctx
        .rebuild(&[WatchEvent::new(&source, ChangeKind::Modified)]);

    let mut buf = [0u8; 64];
    let err = stream.read(&mut buf).unwrap_err();
    assert!(matches!(
        err.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    ));
}

#[test]
fn test_disconnect_deregisters() {
    let running = Running::start(&[]);
    let stream = open_stream(&running);
    running.wait_for_sessions(1);

    drop(stream);
    // the write of the next notification fails and ends the session
    let started = Instant::now();
    while !running.ctx.hub.is_empty() {
        assert!(started.elapsed() < Duration::from_secs(5));
        running.ctx.hub.broadcast();
        thread::sleep(Duration::from_millis(20));
    }
}
