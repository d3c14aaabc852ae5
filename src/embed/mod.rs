//! Embedded static resources.
//!
//! - `build` - built-in page template, used when the site has none
//! - `serve` - dev server fragments (live reload bootstrap, 404 page)

mod template;

pub use template::{Template, TemplateVars};

pub mod build {
    /// Template name the built-in page is registered under.
    pub const PAGE_TEMPLATE_NAME: &str = "page.html";

    /// Minimal page layout. Same data bundle as user templates.
    pub const PAGE_HTML: &str = include_str!("build/page.html");
}

pub mod serve {
    use super::{Template, TemplateVars};

    /// Path of the Server-Sent Events endpoint.
    pub const LIVERELOAD_ENDPOINT: &str = "/_livereload";

    /// Variables for livereload.html.
    pub struct LiveReloadVars<'a> {
        pub endpoint: &'a str,
    }

    impl TemplateVars for LiveReloadVars<'_> {
        fn apply(&self, content: &str) -> String {
            content.replace("__QUIRE_ENDPOINT__", self.endpoint)
        }
    }

    /// Bootstrap `<script>` that reloads the page on a `reload` event.
    pub const LIVERELOAD_HTML: Template<LiveReloadVars<'static>> =
        Template::new(include_str!("serve/livereload.html"));

    /// Variables for not_found.html.
    pub struct NotFoundVars<'a> {
        pub path: &'a str,
    }

    impl TemplateVars for NotFoundVars<'_> {
        fn apply(&self, content: &str) -> String {
            content.replace("__PATH__", &escape_html(self.path))
        }
    }

    pub const NOT_FOUND_HTML: Template<NotFoundVars<'static>> =
        Template::new(include_str!("serve/not_found.html"));

    /// Rendered live reload fragment for the default endpoint.
    pub fn livereload_snippet() -> String {
        LIVERELOAD_HTML.render(&LiveReloadVars {
            endpoint: LIVERELOAD_ENDPOINT,
        })
    }

    fn escape_html(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }
}
