//! Terminal output for builds and the dev server.
//!
//! `log!` always prints, `debug!` only with `--verbose`. While serving, the
//! rebuild outcome goes through the `status_*` functions, which keep a
//! single block at the bottom of the terminal and redraw it on every build.
//!
//! ```ignore
//! log!("build"; "{} of {} files changed", changed, total);
//! debug!("cache"; "stored {}", key);
//! ```

use crossterm::{
    cursor, queue,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Style};
use parking_lot::Mutex;
use std::io::{StdoutLock, Write, stdout};
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enabled by `--verbose`.
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Print a line prefixed with `[module]`.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, but only when verbose.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Prefix colour, picked from the module name.
fn prefix_style(module: &str) -> Style {
    let style = Style::new().bold();
    match module.to_ascii_lowercase().as_str() {
        "serve" | "reload" => style.bright_blue(),
        "watch" => style.bright_green(),
        "error" => style.bright_red(),
        _ => style.bright_yellow(),
    }
}

pub fn log(module: &str, message: &str) {
    let prefix = format!("[{module}]");
    let mut out = stdout().lock();
    // a status block may still own the rest of this line
    queue!(out, Clear(ClearType::UntilNewLine)).ok();
    writeln!(out, "{} {message}", prefix.style(prefix_style(module))).ok();
    out.flush().ok();
}

// ============================================================================
// Rebuild status
// ============================================================================

#[derive(Clone, Copy)]
enum Outcome {
    Built,
    Unchanged,
    Failed,
}

/// The block last printed by a `status_*` call.
struct StatusBlock {
    height: u16,
}

static STATUS: Mutex<StatusBlock> = Mutex::new(StatusBlock { height: 0 });

impl StatusBlock {
    fn replace(&mut self, outcome: Outcome, text: &str) {
        let mut out = stdout().lock();
        self.erase(&mut out);

        let stamp = format!("[{}]", chrono::Local::now().format("%H:%M:%S"));
        let body = match outcome {
            Outcome::Built => format!("{} {text}", "✓".green()),
            Outcome::Unchanged => text.dimmed().to_string(),
            Outcome::Failed => format!("{} {text}", "✗".red()),
        };
        writeln!(out, "{} {body}", stamp.dimmed()).ok();
        out.flush().ok();

        let lines = text.lines().count().max(1);
        self.height = u16::try_from(lines).unwrap_or(u16::MAX);
    }

    fn erase(&self, out: &mut StdoutLock<'_>) {
        if self.height > 0 {
            queue!(out, cursor::MoveUp(self.height), Clear(ClearType::FromCursorDown)).ok();
        }
    }
}

/// A rebuild that wrote or removed something.
pub fn status_success(message: &str) {
    STATUS.lock().replace(Outcome::Built, message);
}

/// A rebuild that found nothing to do.
pub fn status_unchanged(message: &str) {
    STATUS.lock().replace(Outcome::Unchanged, message);
}

/// A failed rebuild; `detail` is printed below the summary when present.
pub fn status_error(summary: &str, detail: &str) {
    let text = if detail.is_empty() {
        summary.to_owned()
    } else {
        format!("{summary}\n{detail}")
    };
    STATUS.lock().replace(Outcome::Failed, &text);
}
