use std::path::PathBuf;

use notify::EventKind;
use notify::event::{MetadataKind, ModifyKind};

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }

    /// Created or modified.
    pub fn is_write(self) -> bool {
        matches!(self, Self::Created | Self::Modified)
    }

    /// `None` for access events and permission or ownership changes.
    ///
    /// A write-time change counts as a modification: the polling watcher
    /// reports every edit that way. Touches without a content change are
    /// later skipped by the cache.
    pub fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Created),
            EventKind::Remove(_) => Some(Self::Removed),
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)) => {
                Some(Self::Modified)
            }
            EventKind::Modify(ModifyKind::Metadata(_)) => None,
            EventKind::Modify(_) => Some(Self::Modified),
            _ => None,
        }
    }
}

/// One path, one change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl WatchEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Split a notify event into per-path events.
    pub fn from_notify(event: &notify::Event) -> Vec<Self> {
        let Some(kind) = ChangeKind::from_notify(&event.kind) else {
            return Vec::new();
        };
        event
            .paths
            .iter()
            .map(|path| Self::new(path.clone(), kind))
            .collect()
    }
}
