//! Content ingestion: markdown documents with TOML front matter.
//!
//! ```text
//! +++
//! title = "Hello"
//! description = "First post"
//! published_at = "2024-01-01"
//! +++
//! Body in markdown...
//! ```
//!
//! Front matter is deserialized loosely and then converted into a
//! [`ContentRecord`]; a document that fails any check is rejected with an
//! error naming the file, instead of reaching the index half-formed.

use crate::error::{Error, Result};
use crate::types::{Body, ContentRecord, Locale, PublishedAt, Slug};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const FRONT_MATTER_FENCE: &str = "+++";

/// Front matter as written by the author
#[derive(Debug, Deserialize)]
struct RawFrontMatter {
    title: String,
    description: String,
    published_at: String,
    slug: Option<String>,
    language: Option<String>,
    #[serde(default)]
    draft: bool,
}

/// Outcome of parsing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Published(ContentRecord),
    Draft,
}

/// Parse one document found at `origin` under `content_dir`.
///
/// The slug defaults to the file stem and the language to the first
/// directory below `content_dir`, so `en/2024/post.md` is English.
pub fn parse_document(text: &str, origin: &Path, content_dir: &Path) -> Result<Document> {
    let invalid = |message: String| Error::InvalidContent {
        path: origin.to_path_buf(),
        message,
    };

    let (front, body) = split_front_matter(text)
        .ok_or_else(|| invalid("missing '+++' front matter block".to_string()))?;

    let raw: RawFrontMatter = toml::from_str(front).map_err(|e| invalid(e.message().to_string()))?;

    if raw.draft {
        return Ok(Document::Draft);
    }

    let slug_source = match raw.slug {
        Some(slug) => slug,
        None => origin
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .ok_or_else(|| invalid("cannot derive slug from file name".to_string()))?,
    };
    let slug = Slug::parse(&slug_source).map_err(|e| invalid(e.to_string()))?;

    let language_source = match raw.language {
        Some(language) => language,
        None => language_dir(origin, content_dir)
            .ok_or_else(|| invalid("cannot derive language from directory".to_string()))?,
    };
    let language = Locale::parse(&language_source).map_err(|e| invalid(e.to_string()))?;

    let title = raw.title.trim().to_string();
    if title.is_empty() {
        return Err(invalid("title must not be empty".to_string()));
    }

    let published_at = PublishedAt::parse(&raw.published_at).map_err(|e| invalid(e.to_string()))?;

    Ok(Document::Published(ContentRecord {
        slug,
        language,
        title,
        description: raw.description.trim().to_string(),
        published_at,
        body: Body::new(body.trim_start()),
    }))
}

/// First directory below `content_dir` on the way to `origin`
fn language_dir(origin: &Path, content_dir: &Path) -> Option<String> {
    let relative = origin.strip_prefix(content_dir).ok()?;
    let mut components = relative.components();
    let first = components.next()?;
    // a file directly in content_dir has no language directory
    components.next()?;
    match first {
        Component::Normal(name) => name.to_str().map(str::to_string),
        _ => None,
    }
}

/// Split `+++ ... +++` front matter from the body
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rest = text.strip_prefix(FRONT_MATTER_FENCE)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONT_MATTER_FENCE {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// All `.md` files under `dir`, sorted by path for a reproducible index order
pub fn content_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InvalidData(format!(
            "Content directory does not exist: {}",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::InvalidData(e.to_string()))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Load every published record under `dir`, failing on the first bad document
pub fn load_content(dir: &Path) -> Result<Vec<ContentRecord>> {
    let mut records = Vec::new();
    for path in content_files(dir)? {
        let text = fs::read_to_string(&path)?;
        match parse_document(&text, &path, dir)? {
            Document::Published(record) => records.push(record),
            Document::Draft => tracing::debug!(path = %path.display(), "skipping draft"),
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HELLO: &str = r#"+++
title = "Hello World"
description = "First post"
published_at = "2024-01-01"
+++

# Hello

Body text.
"#;

    fn parse_at(text: &str, path: &str) -> Result<Document> {
        parse_document(text, Path::new(path), Path::new("content"))
    }

    fn published(doc: Document) -> ContentRecord {
        match doc {
            Document::Published(record) => record,
            Document::Draft => panic!("expected a published document"),
        }
    }

    #[test]
    fn test_parse_document_defaults_from_path() {
        let record = published(parse_at(HELLO, "content/en/hello-world.md").unwrap());
        assert_eq!(record.slug, *"hello-world");
        assert_eq!(record.language, *"en");
        assert_eq!(record.title, "Hello World");
        assert_eq!(record.description, "First post");
        assert_eq!(record.published_at.iso_date(), "2024-01-01");
        assert!(record.body.as_str().starts_with("# Hello"));
    }

    #[test]
    fn test_parse_document_explicit_fields_win() {
        let text = r#"+++
title = "Bonjour"
description = ""
published_at = "2024-01-02T10:00:00Z"
slug = "hello-world"
language = "fr"
+++
Corps.
"#;
        let record = published(parse_at(text, "content/en/bonjour.md").unwrap());
        assert_eq!(record.slug, *"hello-world");
        assert_eq!(record.language, *"fr");
    }

    #[test]
    fn test_parse_document_language_from_top_directory() {
        let record = published(parse_at(HELLO, "content/en/2024/post.md").unwrap());
        assert_eq!(record.language, *"en");
        assert_eq!(record.slug, *"post");

        let err = parse_at(HELLO, "content/post.md").unwrap_err();
        assert!(err.to_string().contains("cannot derive language"));
    }

    #[test]
    fn test_parse_document_crlf() {
        let text = HELLO.replace('\n', "\r\n");
        let record = published(parse_at(&text, "content/en/hello.md").unwrap());
        assert_eq!(record.title, "Hello World");
    }

    #[test]
    fn test_parse_document_draft() {
        let text = "+++\ntitle = \"WIP\"\ndescription = \"\"\npublished_at = \"2024-01-01\"\ndraft = true\n+++\n";
        assert_eq!(
            parse_at(text, "content/en/wip.md").unwrap(),
            Document::Draft
        );
    }

    #[test]
    fn test_parse_document_missing_front_matter() {
        let err = parse_at("# Just markdown", "content/en/x.md").unwrap_err();
        assert!(err.to_string().contains("front matter"));
        assert!(err.to_string().contains("content/en/x.md"));
    }

    #[test]
    fn test_parse_document_unterminated_front_matter() {
        let text = "+++\ntitle = \"x\"\n";
        assert!(parse_at(text, "content/en/x.md").is_err());
    }

    #[test]
    fn test_parse_document_missing_field() {
        let text = "+++\ntitle = \"x\"\ndescription = \"\"\n+++\n";
        let err = parse_at(text, "content/en/x.md").unwrap_err();
        assert!(err.to_string().contains("published_at"));
    }

    #[test]
    fn test_parse_document_rejects_bad_values() {
        let bad_date = "+++\ntitle = \"x\"\ndescription = \"\"\npublished_at = \"soon\"\n+++\n";
        assert!(parse_at(bad_date, "content/en/x.md").is_err());

        let bad_slug = "+++\ntitle = \"x\"\ndescription = \"\"\npublished_at = \"2024-01-01\"\n+++\n";
        assert!(parse_at(bad_slug, "content/en/Bad Name.md").is_err());

        let empty_title = "+++\ntitle = \"  \"\ndescription = \"\"\npublished_at = \"2024-01-01\"\n+++\n";
        assert!(parse_at(empty_title, "content/en/x.md").is_err());
    }

    #[test]
    fn test_load_content_walks_sorted_and_skips_drafts() {
        let dir = TempDir::new().unwrap();
        let en = dir.path().join("en");
        let fr = dir.path().join("fr");
        fs::create_dir_all(&en).unwrap();
        fs::create_dir_all(&fr).unwrap();
        fs::write(en.join("b.md"), HELLO).unwrap();
        fs::write(en.join("a.md"), HELLO).unwrap();
        fs::write(fr.join("a.md"), HELLO).unwrap();
        fs::write(en.join("notes.txt"), "ignored").unwrap();
        fs::create_dir_all(en.join("2024")).unwrap();
        fs::write(en.join("2024").join("c.md"), HELLO).unwrap();
        fs::write(
            en.join("draft.md"),
            "+++\ntitle = \"d\"\ndescription = \"\"\npublished_at = \"2024-01-01\"\ndraft = true\n+++\n",
        )
        .unwrap();

        let records = load_content(dir.path()).unwrap();
        let keys: Vec<String> = records
            .iter()
            .map(|r| format!("{}/{}", r.language, r.slug))
            .collect();
        assert_eq!(keys, ["en/c", "en/a", "en/b", "fr/a"]);
    }

    #[test]
    fn test_load_content_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(load_content(&dir.path().join("nope")).is_err());
    }
}
