//! YAML front matter between two `---` lines.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, de};
use thiserror::Error;

/// Recognized front matter keys. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: Option<NaiveDate>,
    #[serde(deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    pub draft: bool,
    pub excerpt: Option<String>,
}

/// Malformed metadata block. Never fatal: the caller falls back to
/// filename-derived metadata.
#[derive(Debug, Error)]
#[error("invalid front matter: {0}")]
pub struct FrontMatterError(#[from] serde_yaml::Error);

/// Split `content` into `(metadata, body)`.
///
/// The first line must be exactly `---` and a later line must be exactly
/// `---`. Otherwise there is no front matter and `None` is returned.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let (first, rest) = content.split_once('\n')?;
    if first.trim_end_matches('\r') != "---" {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let meta = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((meta, body));
        }
        offset += line.len();
    }
    None
}

/// Parse a metadata block. An empty block yields the defaults.
pub fn parse(meta: &str) -> Result<FrontMatter, FrontMatterError> {
    let trimmed = meta.trim();
    if trimmed.is_empty() {
        return Ok(FrontMatter::default());
    }
    Ok(serde_yaml::from_str(trimmed)?)
}

/// Accepts `2024-01-05`, RFC 3339, or `2024-01-05 10:00:00`.
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .map(Some)
        .map_err(|_| de::Error::custom(format!("unrecognized date `{raw}`")))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    List(Vec<String>),
    Csv(String),
}

/// Sequence or comma-separated string; empty entries dropped, duplicates
/// removed keeping first occurrence.
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = match Option::<RawTags>::deserialize(deserializer)? {
        None => return Ok(Vec::new()),
        Some(RawTags::List(list)) => list,
        Some(RawTags::Csv(csv)) => csv.split(',').map(str::to_owned).collect(),
    };

    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_owned());
        }
    }
    Ok(tags)
}
