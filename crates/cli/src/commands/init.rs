use anyhow::{Context, Result};
use blog_kit_core::{Locale, SITE_TOML};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

const SAMPLE_SLUG: &str = "hello-world";

/// Escape a string for safe inclusion in TOML per TOML v1.0.0 spec
///
/// Handles the required escape sequences for TOML basic strings:
/// - Backslash (\\) -> \\\\
/// - Quote (\") -> \\\"
/// - Backspace (\b) -> \\b
/// - Form feed (\f) -> \\f
/// - Newline (\n) -> \\n
/// - Carriage return (\r) -> \\r
/// - Tab (\t) -> \\t
///
/// The site.toml template carries comments, which the toml crate's
/// serializer would drop, so it is written by hand.
///
/// See: https://toml.io/en/v1.0.0#string
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Initialize a new site directory
pub async fn run(path: PathBuf, title: String, locales: Vec<String>) -> Result<()> {
    println!("📝 Initializing site at: {}", path.display());

    scaffold(&path, &title, &locales)?;

    println!("\n✓ Created {} and sample posts", SITE_TOML);
    println!("\nNext steps:");
    println!("  1. Write posts under content/<locale>/");
    println!("  2. Set [views].endpoint in {} to enable view counts", SITE_TOML);
    println!("  3. Run 'blog-kit preview {}'", path.display());

    Ok(())
}

/// Write site.toml and one sample post per locale
pub fn scaffold(path: &Path, title: &str, locales: &[String]) -> Result<()> {
    if path.join(SITE_TOML).exists() {
        anyhow::bail!("{} already exists in {}", SITE_TOML, path.display());
    }

    let locales = locales
        .iter()
        .map(|l| Locale::parse(l))
        .collect::<blog_kit_core::Result<Vec<_>>>()
        .context("Invalid locale")?;
    let Some(default_locale) = locales.first() else {
        anyhow::bail!("At least one locale is required");
    };

    fs::create_dir_all(path).context("Failed to create site directory")?;
    fs::write(path.join(SITE_TOML), generate_site_toml(title, &locales, default_locale))
        .with_context(|| format!("Failed to write {}", SITE_TOML))?;

    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    for locale in &locales {
        let dir = path.join("content").join(locale.as_str());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        fs::write(
            dir.join(format!("{}.md", SAMPLE_SLUG)),
            generate_sample_post(&today),
        )
        .context("Failed to write sample post")?;
    }

    Ok(())
}

fn generate_site_toml(title: &str, locales: &[Locale], default_locale: &Locale) -> String {
    let locale_list = locales
        .iter()
        .map(|l| format!("\"{}\"", l))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"[site]
title = "{title}"
description = ""
base_url = "https://example.com"
default_locale = "{default_locale}"
locales = [{locale_list}]

[content]
dir = "content"
# "strict": an article missing in a locale is a 404
# "fallback": show the default-locale version with a notice
locale_policy = "strict"

# [views]
# endpoint = "https://views.example.com"
# increment_on_view = true

# [messages.{default_locale}]
# blog = "Blog"
# back_to_blog = "Back to blog"
# no_translation = "This article is not available in your language."
# post_views = "views"
# not_found = "Page not found"
# post_count = "{{count}} posts"
# date_format = "%B %-d, %Y"
"#,
        title = toml_escape_string(title),
    )
}

fn generate_sample_post(date: &str) -> String {
    format!(
        r#"+++
title = "Hello, world"
description = "The first post"
published_at = "{date}"
+++

Welcome to the blog.
"#
    )
}
