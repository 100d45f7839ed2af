use crate::error::{Error, Result};
use crate::resolve::LocalePolicy;
use crate::types::Locale;
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Complete site configuration
#[derive(Debug, Clone)]
pub struct Site {
    pub metadata: SiteMetadata,
    pub content: ContentConfig,
    pub views: Option<ViewsConfig>,
    messages: BTreeMap<Locale, Messages>,
    default_messages: Messages,
}

#[derive(Debug, Clone)]
pub struct SiteMetadata {
    pub title: String,
    pub description: String,
    pub base_url: String,
    pub default_locale: Locale,
    pub locales: Vec<Locale>,
}

#[derive(Debug, Clone)]
pub struct ContentConfig {
    pub dir: PathBuf,
    pub locale_policy: LocalePolicy,
}

/// View-count store settings. Without them no counter is rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewsConfig {
    pub endpoint: String,
    #[serde(default = "default_increment_on_view")]
    pub increment_on_view: bool,
}

fn default_increment_on_view() -> bool {
    true
}

/// UI strings for one locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub blog: String,
    pub back_to_blog: String,
    pub no_translation: String,
    pub post_views: String,
    pub not_found: String,
    /// Listing header; `{count}` is replaced with the number of posts
    pub post_count: String,
    /// strftime pattern for visible dates, month names follow the locale
    pub date_format: String,
}

impl Messages {
    pub fn post_count(&self, count: usize) -> String {
        self.post_count.replace("{count}", &count.to_string())
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            blog: "Blog".to_string(),
            back_to_blog: "Back to blog".to_string(),
            no_translation: "This article is not available in your language.".to_string(),
            post_views: "views".to_string(),
            not_found: "Page not found".to_string(),
            post_count: "{count} posts".to_string(),
            date_format: "%B %-d, %Y".to_string(),
        }
    }
}

impl Site {
    /// UI strings for `locale`, falling back to the default locale's
    pub fn messages(&self, locale: &Locale) -> &Messages {
        self.messages
            .get(locale)
            .or_else(|| self.messages.get(&self.metadata.default_locale))
            .unwrap_or(&self.default_messages)
    }
}

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSiteMetadata,
    #[serde(default)]
    content: RawContentConfig,
    views: Option<ViewsConfig>,
    #[serde(default)]
    messages: BTreeMap<String, RawMessages>,
}

#[derive(Debug, Deserialize)]
struct RawSiteMetadata {
    title: String,
    #[serde(default)]
    description: String,
    base_url: String,
    default_locale: String,
    locales: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawContentConfig {
    dir: Option<String>,
    #[serde(default)]
    locale_policy: LocalePolicy,
}

#[derive(Debug, Default, Deserialize)]
struct RawMessages {
    blog: Option<String>,
    back_to_blog: Option<String>,
    no_translation: Option<String>,
    post_views: Option<String>,
    not_found: Option<String>,
    post_count: Option<String>,
    date_format: Option<String>,
}

impl RawMessages {
    fn merge_onto(self, base: &Messages) -> Messages {
        Messages {
            blog: self.blog.unwrap_or_else(|| base.blog.clone()),
            back_to_blog: self.back_to_blog.unwrap_or_else(|| base.back_to_blog.clone()),
            no_translation: self
                .no_translation
                .unwrap_or_else(|| base.no_translation.clone()),
            post_views: self.post_views.unwrap_or_else(|| base.post_views.clone()),
            not_found: self.not_found.unwrap_or_else(|| base.not_found.clone()),
            post_count: self.post_count.unwrap_or_else(|| base.post_count.clone()),
            date_format: self.date_format.unwrap_or_else(|| base.date_format.clone()),
        }
    }
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<Site> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<Site> {
    let raw: RawConfig = toml::from_str(content)?;

    let locales = raw
        .site
        .locales
        .iter()
        .map(|l| Locale::parse(l).map_err(|e| Error::ConfigParse(format!("site.locales: {}", e))))
        .collect::<Result<Vec<_>>>()?;
    if locales.is_empty() {
        return Err(Error::ConfigParse(
            "site.locales must list at least one locale".to_string(),
        ));
    }

    let default_locale = Locale::parse(&raw.site.default_locale)
        .map_err(|e| Error::ConfigParse(format!("site.default_locale: {}", e)))?;
    if !locales.contains(&default_locale) {
        return Err(Error::ConfigParse(format!(
            "site.default_locale '{}' is not listed in site.locales",
            default_locale
        )));
    }

    if let Some(views) = &raw.views
        && !(views.endpoint.starts_with("http://") || views.endpoint.starts_with("https://"))
    {
        return Err(Error::ConfigParse(format!(
            "views.endpoint must be an http(s) URL: '{}'",
            views.endpoint
        )));
    }

    let dir = validate_path(raw.content.dir.as_deref().unwrap_or("content"), "content.dir")?;

    let default_messages = Messages::default();
    let mut raw_messages = raw.messages;
    let mut messages = BTreeMap::new();
    for locale in &locales {
        let entry = raw_messages
            .remove(locale.as_str())
            .unwrap_or_default()
            .merge_onto(&default_messages);
        if StrftimeItems::new(&entry.date_format).any(|item| item == Item::Error) {
            return Err(Error::ConfigParse(format!(
                "messages.{}.date_format is not a valid date pattern: '{}'",
                locale, entry.date_format
            )));
        }
        messages.insert(locale.clone(), entry);
    }
    if let Some(unused) = raw_messages.keys().next() {
        return Err(Error::ConfigParse(format!(
            "messages.{} does not match any configured locale",
            unused
        )));
    }

    Ok(Site {
        metadata: SiteMetadata {
            title: raw.site.title,
            description: raw.site.description,
            base_url: raw.site.base_url.trim_end_matches('/').to_string(),
            default_locale,
            locales,
        },
        content: ContentConfig {
            dir,
            locale_policy: raw.content.locale_policy,
        },
        views: raw.views,
        messages,
        default_messages,
    })
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and `..` components so a site.toml cannot point
/// the build outside the site directory.
///
/// # Examples
///
/// ```text
/// validate_path("content", "content.dir")      → Ok(PathBuf)
/// validate_path("/etc", "content.dir")         → Err("Absolute paths not allowed...")
/// validate_path("../other", "content.dir")     → Err("Parent directory references...")
/// ```
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    Ok(path.to_path_buf())
}
