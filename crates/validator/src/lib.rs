// Site checks run before a build: configuration, every content document,
// and cross-document consistency. Unlike the build, it keeps going after
// the first problem so the author sees all of them at once.

use blog_kit_core::content::{Document, content_files, parse_document};
use blog_kit_core::{ContentRecord, SITE_TOML, parse_site_toml};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate_site(root: &Path) -> ValidationReport {
    let mut report = ValidationReport::default();

    let site = match parse_site_toml(root.join(SITE_TOML)) {
        Ok(site) => site,
        Err(e) => {
            report.errors.push(format!("{}: {}", SITE_TOML, e));
            return report;
        }
    };
    report.info.push(format!(
        "Site '{}' with locales: {}",
        site.metadata.title,
        site.metadata
            .locales
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ));

    let content_dir = root.join(&site.content.dir);
    let files = match content_files(&content_dir) {
        Ok(files) => files,
        Err(e) => {
            report.errors.push(e.to_string());
            return report;
        }
    };

    let mut records: Vec<ContentRecord> = Vec::new();
    let mut drafts = 0;
    for path in &files {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                report
                    .errors
                    .push(format!("Cannot read {}: {}", path.display(), e));
                continue;
            }
        };
        match parse_document(&text, path, &content_dir) {
            Ok(Document::Published(record)) => records.push(record),
            Ok(Document::Draft) => drafts += 1,
            Err(e) => report.errors.push(e.to_string()),
        }
    }

    let mut seen = BTreeSet::new();
    for record in &records {
        if !seen.insert((record.slug.as_str(), record.language.as_str())) {
            report.errors.push(format!(
                "Duplicate article '{}' in language '{}'",
                record.slug, record.language
            ));
        }
        if !site.metadata.locales.contains(&record.language) {
            report.warnings.push(format!(
                "Article '{}' is in language '{}', which is not listed in site.locales; it will not be listed",
                record.slug, record.language
            ));
        }
    }

    let mut languages_by_slug: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for record in &records {
        languages_by_slug
            .entry(record.slug.as_str())
            .or_default()
            .insert(record.language.as_str());
    }
    for (slug, languages) in &languages_by_slug {
        let missing: Vec<&str> = site
            .metadata
            .locales
            .iter()
            .map(|l| l.as_str())
            .filter(|l| !languages.contains(l))
            .collect();
        if !missing.is_empty() {
            report.info.push(format!(
                "Article '{}' has no translation for: {}",
                slug,
                missing.join(", ")
            ));
        }
    }

    report.info.push(format!(
        "{} articles, {} drafts",
        records.len(),
        drafts
    ));

    report
}
