use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam::channel::{Receiver, Sender, unbounded};

use super::*;
use super::types::ChangeKind;

/// In-memory source driven by the test.
struct FakeSource {
    events: Receiver<WatchEvent>,
    errors: Receiver<notify::Error>,
}

impl EventSource for FakeSource {
    fn events(&self) -> &Receiver<WatchEvent> {
        &self.events
    }

    fn errors(&self) -> &Receiver<notify::Error> {
        &self.errors
    }
}

fn fake() -> (FakeSource, Sender<WatchEvent>, Sender<notify::Error>) {
    let (event_tx, events) = unbounded();
    let (error_tx, errors) = unbounded();
    (FakeSource { events, errors }, event_tx, error_tx)
}

fn modified(path: &str) -> WatchEvent {
    WatchEvent::new(path, ChangeKind::Modified)
}

const SETTLE: Duration = Duration::from_millis(20);

#[test]
fn test_write_triggers_once() {
    let (source, tx, _etx) = fake();
    tx.send(modified("content/a.md")).unwrap();
    drop(tx);

    let mut batches = Vec::new();
    let exit = WatchLoop::new(&source, "md", SETTLE).run(|| false, |b| batches.push(b.to_vec()));

    assert_eq!(exit, WatchExit::SourceClosed);
    assert_eq!(batches, vec![vec![modified("content/a.md")]]);
}

#[test]
fn test_temp_files_never_trigger() {
    let (source, tx, _etx) = fake();
    for path in ["content/a.md~", "content/.a.md.swp", "content/4913", "content/a.md.bak"] {
        tx.send(modified(path)).unwrap();
    }
    tx.send(WatchEvent::new("content/a.md.tmp", ChangeKind::Created)).unwrap();
    drop(tx);

    let mut calls = 0;
    WatchLoop::new(&source, "md", SETTLE).run(|| false, |_| calls += 1);
    assert_eq!(calls, 0);
}

#[test]
fn test_removals_and_other_extensions_ignored() {
    let (source, tx, _etx) = fake();
    tx.send(WatchEvent::new("content/a.md", ChangeKind::Removed)).unwrap();
    tx.send(modified("content/style.css")).unwrap();
    drop(tx);

    let mut calls = 0;
    WatchLoop::new(&source, "md", SETTLE).run(|| false, |_| calls += 1);
    assert_eq!(calls, 0);
}

#[test]
fn test_burst_coalesces() {
    let (source, tx, _etx) = fake();
    tx.send(WatchEvent::new("content/a.md", ChangeKind::Created)).unwrap();
    tx.send(modified("content/a.md")).unwrap();
    tx.send(modified("content/a.md~")).unwrap();
    tx.send(modified("content/b.md")).unwrap();
    drop(tx);

    let mut batches = Vec::new();
    WatchLoop::new(&source, "md", SETTLE).run(|| false, |b| batches.push(b.to_vec()));

    assert_eq!(
        batches,
        vec![vec![modified("content/a.md"), modified("content/b.md")]]
    );
}

#[test]
fn test_separate_bursts_build_separately() {
    let (source, tx, _etx) = fake();
    let sender = thread::spawn(move || {
        tx.send(modified("content/a.md")).unwrap();
        thread::sleep(Duration::from_millis(200));
        tx.send(modified("content/b.md")).unwrap();
    });

    let mut batches = Vec::new();
    WatchLoop::new(&source, "md", SETTLE).run(|| false, |b| batches.push(b.to_vec()));
    sender.join().unwrap();

    assert_eq!(batches.len(), 2);
}

#[test]
fn test_errors_do_not_stop_loop() {
    let (source, tx, etx) = fake();
    etx.send(notify::Error::generic("transient")).unwrap();
    etx.send(notify::Error::generic("again")).unwrap();

    let sender = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        tx.send(modified("content/a.md")).unwrap();
    });

    let mut calls = 0;
    let exit = WatchLoop::new(&source, "md", SETTLE).run(|| false, |_| calls += 1);
    sender.join().unwrap();

    assert_eq!(calls, 1);
    assert_eq!(exit, WatchExit::SourceClosed);
    drop(etx);
}

#[test]
fn test_closed_error_stream_ends_loop() {
    let (source, _tx, etx) = fake();
    drop(etx);

    let exit = WatchLoop::new(&source, "md", SETTLE).run(|| false, |_| {});
    assert_eq!(exit, WatchExit::SourceClosed);
}

#[test]
fn test_shutdown() {
    let (source, _tx, _etx) = fake();
    let stop = AtomicBool::new(false);

    let exit = WatchLoop::new(&source, "md", SETTLE).run(
        || {
            let was = stop.load(Ordering::SeqCst);
            stop.store(true, Ordering::SeqCst);
            was
        },
        |_| {},
    );
    assert_eq!(exit, WatchExit::Shutdown);
}

#[test]
fn test_build_blocks_next_event() {
    let (source, tx, _etx) = fake();
    tx.send(modified("content/a.md")).unwrap();

    let mut batches = Vec::new();
    let tx_inner = tx.clone();
    drop(tx);
    let mut tx_slot = Some(tx_inner);
    WatchLoop::new(&source, "md", SETTLE).run(
        || false,
        |b| {
            batches.push(b.to_vec());
            // events arriving mid-build wait for the next round
            if let Some(tx) = tx_slot.take() {
                tx.send(modified("content/b.md")).unwrap();
            }
        },
    );

    assert_eq!(
        batches,
        vec![vec![modified("content/a.md")], vec![modified("content/b.md")]]
    );
}
