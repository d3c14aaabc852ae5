//! `[serve]`: the development server and its content watcher.
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"
//! port = 5277
//! watch = true
//! debounce_ms = 100        # quiet time before a burst of saves is rebuilt
//! poll = false             # stat the tree instead of native events
//! poll_interval_ms = 500
//! ```

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    pub interface: IpAddr,

    /// First port tried; the next nine are fallbacks.
    pub port: u16,

    /// Rebuild and reload browsers when content changes.
    pub watch: bool,

    /// Settle window in milliseconds.
    pub debounce_ms: u64,

    /// For file systems without change notifications.
    pub poll: bool,

    pub poll_interval_ms: u64,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5277,
            watch: true,
            debounce_ms: 100,
            poll: false,
            poll_interval_ms: 500,
        }
    }
}
