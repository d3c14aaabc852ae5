//! Editor and VCS noise filtering.

use std::path::Path;

use super::types::WatchEvent;
use crate::build::scan::has_extension;
use crate::utils::path::to_slash;

/// File name fragments of backup, swap and temp files.
const DENIED_NAME_PARTS: &[&str] = &["~", ".swp", ".swx", ".swo", ".tmp", ".bak"];

/// Path fragments of version control internals.
const DENIED_PATH_PARTS: &[&str] = &["/.git/", "/.hg/", "/.svn/"];

/// vim probes directory writability with this file.
const VIM_PROBE: &str = "4913";

pub fn is_denied(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if name == VIM_PROBE || DENIED_NAME_PARTS.iter().any(|part| name.contains(part)) {
        return true;
    }

    let full = to_slash(path);
    DENIED_PATH_PARTS.iter().any(|part| full.contains(part))
}

/// A write to a content file that is not editor noise.
pub fn qualifies(event: &WatchEvent, extension: &str) -> bool {
    event.kind.is_write() && !is_denied(&event.path) && has_extension(&event.path, extension)
}
