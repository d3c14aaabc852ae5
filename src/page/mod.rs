//! Documents built from content files.
//!
//! A [`Document`] lives for one build pass. Title and slug come from the
//! file name unless front matter overrides the title; the slug always
//! follows the file name so the output path stays stable.

pub mod excerpt;
pub mod frontmatter;

use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::log;
use crate::utils::path::{file_stem, slugify, title_from_stem};

pub use frontmatter::FrontMatterError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    /// Markdown source without the front matter block.
    pub body: String,
    pub slug: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub draft: bool,
    pub excerpt: String,
}

impl Document {
    /// Build a document from a source file's path and contents.
    ///
    /// Malformed front matter is logged and the whole content becomes the
    /// body, with filename-derived metadata.
    pub fn from_source(path: &Path, content: &str) -> Self {
        match Self::parse(path, content) {
            Ok(doc) => doc,
            Err(e) => {
                log!("page"; "{}: {}, using file name", path.display(), e);
                Self::fallback(path, content)
            }
        }
    }

    /// Strict variant of [`Document::from_source`].
    pub fn parse(path: &Path, content: &str) -> Result<Self, FrontMatterError> {
        let Some((meta, body)) = frontmatter::split(content) else {
            return Ok(Self::fallback(path, content));
        };
        let fm = frontmatter::parse(meta)?;

        let stem = file_stem(path);
        let excerpt = fm.excerpt.unwrap_or_else(|| excerpt::derive(body));
        Ok(Self {
            title: fm.title.unwrap_or_else(|| title_from_stem(&stem)),
            body: body.to_string(),
            slug: slugify(&stem),
            date: fm.date.unwrap_or_else(today),
            tags: fm.tags,
            draft: fm.draft,
            excerpt,
        })
    }

    /// Filename-derived metadata, `content` verbatim as the body.
    pub fn fallback(path: &Path, content: &str) -> Self {
        let stem = file_stem(path);
        Self {
            title: title_from_stem(&stem),
            body: content.to_string(),
            slug: slugify(&stem),
            date: today(),
            tags: Vec::new(),
            draft: false,
            excerpt: excerpt::derive(content),
        }
    }

    /// Output file name, `<slug>.html`.
    pub fn output_name(&self) -> String {
        output_name(&self.slug)
    }
}

/// Slug for a content path.
pub fn slug_for(path: &Path) -> String {
    slugify(&file_stem(path))
}

/// `<slug>.html`
pub fn output_name(slug: &str) -> String {
    format!("{slug}.html")
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
