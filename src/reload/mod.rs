//! Live reload over Server-Sent Events.
//!
//! ```text
//! watcher ─► build ok ─► LiveReload::broadcast ─► Session (one thread each) ─► browser
//! ```
//!
//! - `broadcaster` - session registry, non-blocking fan-out
//! - `session` - SSE stream lifecycle for one connection

mod broadcaster;
pub mod session;

pub use broadcaster::{LiveReload, SessionId};
pub use session::Session;
