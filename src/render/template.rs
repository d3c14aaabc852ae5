//! Named template store backed by minijinja.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{Datelike, Local};
use minijinja::{Environment, ErrorKind};
use serde::Serialize;

use super::Render;
use crate::build::BuildError;
use crate::debug;
use crate::embed::build::{PAGE_HTML, PAGE_TEMPLATE_NAME};
use crate::page::Document;

/// Data bundle handed to every page template.
#[derive(Debug, Clone, Serialize)]
pub struct PageData<'a> {
    pub title: &'a str,
    /// Rendered HTML fragment.
    pub content: &'a str,
    /// `YYYY-MM-DD`
    pub date: String,
    pub tags: &'a [String],
    pub excerpt: &'a str,
    pub current_year: i32,
    pub slug: &'a str,
}

impl<'a> PageData<'a> {
    pub fn new(doc: &'a Document, content: &'a str) -> Self {
        Self {
            title: &doc.title,
            content,
            date: doc.date.format("%Y-%m-%d").to_string(),
            tags: &doc.tags,
            excerpt: &doc.excerpt,
            current_year: Local::now().year(),
            slug: &doc.slug,
        }
    }
}

/// Templates by file name. The built-in `page.html` is registered first and
/// can be overridden by a file of the same name.
pub struct TemplateStore {
    env: Environment<'static>,
}

impl TemplateStore {
    /// Store holding only the built-in page template.
    pub fn builtin() -> Self {
        let mut env = Environment::new();
        if let Err(e) = env.add_template(PAGE_TEMPLATE_NAME, PAGE_HTML) {
            crate::log!("error"; "built-in template: {}", e);
        }
        Self { env }
    }

    /// Built-in templates plus every `*.html` file directly inside `dir`.
    ///
    /// A missing directory is not an error.
    pub fn load(dir: &Path) -> Result<Self, BuildError> {
        let mut store = Self::builtin();

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(store),
            Err(source) => {
                return Err(BuildError::Read {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "html") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let source = fs::read_to_string(&path).map_err(|source| BuildError::Read {
                path: path.clone(),
                source,
            })?;
            store.add(name.to_string(), source)?;
            debug!("template"; "loaded {}", name);
        }

        Ok(store)
    }

    /// Register (or replace) a template.
    pub fn add(&mut self, name: String, source: String) -> Result<(), BuildError> {
        self.env
            .add_template_owned(name.clone(), source)
            .map_err(|e| BuildError::Render {
                name,
                message: e.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }
}

impl Render for TemplateStore {
    fn render(&self, name: &str, data: &PageData<'_>) -> Result<String, BuildError> {
        let template = self
            .env
            .get_template(name)
            .map_err(|e| template_error(name, &e))?;
        template.render(data).map_err(|e| template_error(name, &e))
    }
}

/// Includes of a missing template report as missing too.
fn template_error(name: &str, e: &minijinja::Error) -> BuildError {
    match e.kind() {
        ErrorKind::TemplateNotFound => BuildError::TemplateMissing {
            name: name.to_string(),
        },
        _ => BuildError::Render {
            name: name.to_string(),
            message: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn doc() -> Document {
        Document {
            title: "Hello <World>".into(),
            body: "# Hi".into(),
            slug: "hello".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            tags: vec!["rust".into(), "web".into()],
            draft: false,
            excerpt: "Short".into(),
        }
    }

    #[test]
    fn test_builtin_page() {
        let store = TemplateStore::builtin();
        let doc = doc();
        let html = store
            .render("page.html", &PageData::new(&doc, "<h1>Hi</h1>"))
            .unwrap();

        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("Hello &lt;World&gt;"));
        assert!(html.contains("2024-05-06"));
        assert!(html.contains("<li>rust</li>"));
        assert!(html.contains("</body>"));
    }

    #[test]
    fn test_missing_template() {
        let store = TemplateStore::builtin();
        let doc = doc();
        let err = store
            .render("nope.html", &PageData::new(&doc, ""))
            .unwrap_err();
        assert!(matches!(err, BuildError::TemplateMissing { ref name } if name == "nope.html"));
    }

    #[test]
    fn test_load_directory_overrides_builtin() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("page.html"), "<b>{{ title }}</b>|{{ content | safe }}").unwrap();
        fs::write(dir.path().join("post.html"), "{{ slug }}:{{ tags | join(',') }}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = TemplateStore::load(dir.path()).unwrap();
        let doc = doc();
        let data = PageData::new(&doc, "<p>x</p>");

        assert_eq!(store.render("page.html", &data).unwrap(), "<b>Hello &lt;World&gt;</b>|<p>x</p>");
        assert_eq!(store.render("post.html", &data).unwrap(), "hello:rust,web");
        assert!(!store.contains("notes.txt"));
    }

    #[test]
    fn test_load_missing_directory() {
        let store = TemplateStore::load(Path::new("/nonexistent/templates")).unwrap();
        assert!(store.contains("page.html"));
    }

    #[test]
    fn test_syntax_error_is_render_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.html"), "{% if %}").unwrap();
        assert!(matches!(
            TemplateStore::load(dir.path()),
            Err(BuildError::Render { .. })
        ));
    }

    #[test]
    fn test_current_year() {
        let doc = doc();
        let data = PageData::new(&doc, "");
        assert_eq!(data.current_year, Local::now().year());
    }
}
