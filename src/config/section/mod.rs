//! Configuration section definitions.
//!
//! Each module corresponds to a section in `quire.toml`:
//!
//! | Module     | TOML Section   | Purpose                                 |
//! |------------|----------------|-----------------------------------------|
//! | `build`    | `[build]`      | Content/output paths, templates, cache  |
//! | `serve`    | `[serve]`      | Development server and watcher          |

pub mod build;
mod serve;

pub use build::BuildSectionConfig;
pub use serve::ServeConfig;
