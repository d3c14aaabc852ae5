//! Render collaborators.
//!
//! Conversion ([`Convert`]) and templating ([`Render`]) are traits so the
//! orchestrator can be driven by fakes in tests.

mod inject;
mod markdown;
mod template;

pub use inject::inject_livereload;
pub use markdown::Markdown;
pub use template::{PageData, TemplateStore};

use crate::build::BuildError;

/// `convert(markdown) -> html`. Must not fail; errors become fallback HTML.
pub trait Convert: Send + Sync {
    fn convert(&self, markdown: &str) -> String;
}

/// `render(name, data) -> html` over a named template store.
pub trait Render: Send + Sync {
    fn render(&self, name: &str, data: &PageData<'_>) -> Result<String, BuildError>;
}
