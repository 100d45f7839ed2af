use crate::error::{Error, Result};
use crate::types::{ContentRecord, Locale, Slug};
use std::collections::HashMap;

/// Immutable collection of every content record in a build.
///
/// Constructed once, then shared by reference. Records keep the order they
/// were given in, which is the tie-break for equal publish dates.
#[derive(Debug, Default)]
pub struct ContentIndex {
    records: Vec<ContentRecord>,
    // slug -> language -> position in `records`
    by_slug: HashMap<String, HashMap<String, usize>>,
}

impl ContentIndex {
    /// Build the index, rejecting a second record for the same `(slug, language)`
    pub fn new(records: Vec<ContentRecord>) -> Result<Self> {
        let mut by_slug: HashMap<String, HashMap<String, usize>> = HashMap::new();

        for (position, record) in records.iter().enumerate() {
            let languages = by_slug.entry(record.slug.to_string()).or_default();
            if languages
                .insert(record.language.to_string(), position)
                .is_some()
            {
                return Err(Error::DuplicateRecord {
                    slug: record.slug.to_string(),
                    language: record.language.to_string(),
                });
            }
        }

        tracing::debug!(records = records.len(), slugs = by_slug.len(), "content index built");

        Ok(Self { records, by_slug })
    }

    pub fn records(&self) -> &[ContentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for exactly this slug and language
    pub fn get(&self, slug: &str, language: &str) -> Option<&ContentRecord> {
        let position = *self.by_slug.get(slug)?.get(language)?;
        self.records.get(position)
    }

    /// All languages a slug exists in, in index order
    pub fn translations(&self, slug: &str) -> Vec<&ContentRecord> {
        self.records.iter().filter(|r| r.slug == *slug).collect()
    }

    /// Distinct slugs, first-seen order
    pub fn slugs(&self) -> Vec<&Slug> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&&record.slug) {
                seen.push(&record.slug);
            }
        }
        seen
    }

    /// Distinct record languages, first-seen order
    pub fn locales(&self) -> Vec<&Locale> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&&record.language) {
                seen.push(&record.language);
            }
        }
        seen
    }
}
