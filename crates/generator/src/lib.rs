//! Static site generation.
//!
//! Produces every page of the blog in memory; callers decide whether to
//! write it to disk (`build`) or serve it (`preview`).

pub mod dates;
pub mod html;
pub mod pages;
pub mod script;

use blog_kit_core::{ContentIndex, Site, project, resolve_with_policy};
use pages::CounterMarkup;

pub const VIEW_COUNTER_JS: &str = "view-counter.js";

#[derive(Debug, Default)]
pub struct GeneratedSite {
    pub pages: Vec<(String, String)>,   // (path, html)
    pub assets: Vec<(String, Vec<u8>)>, // (path, data)
}

impl GeneratedSite {
    pub fn page(&self, path: &str) -> Option<&str> {
        self.pages
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, html)| html.as_str())
    }

    pub fn asset(&self, path: &str) -> Option<&[u8]> {
        self.assets
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, data)| data.as_slice())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Serve counters from the preview server and inject hot reload
    pub is_preview: bool,
}

/// Render the whole site for `index`
pub fn generate_site(site: &Site, index: &ContentIndex, options: GenerateOptions) -> GeneratedSite {
    let counter = counter_markup(site, options);
    let mut generated = GeneratedSite::default();

    for language in index.locales() {
        if !site.metadata.locales.contains(language) {
            tracing::warn!(%language, "articles in a language missing from site.locales are not rendered");
        }
    }

    generated.pages.push((
        "index.html".to_string(),
        pages::redirect_page(&format!("/{}/blog/", site.metadata.default_locale)),
    ));
    generated
        .pages
        .push(("404.html".to_string(), pages::not_found_page(site, options)));

    for locale in &site.metadata.locales {
        let posts = project(index, locale.as_str());
        generated.pages.push((
            format!("{}/blog/index.html", locale),
            pages::listing_page(site, locale, &posts, options, counter.as_ref()),
        ));

        for slug in index.slugs() {
            let resolution = match resolve_with_policy(
                index,
                slug.as_str(),
                locale.as_str(),
                site.content.locale_policy,
                &site.metadata.default_locale,
            ) {
                Ok(resolution) => resolution,
                Err(not_found) => {
                    tracing::debug!(%not_found, "no page generated");
                    continue;
                }
            };
            generated.pages.push((
                format!("{}/blog/{}/index.html", locale, slug),
                pages::article_page(site, index, locale, resolution, options, counter.as_ref()),
            ));
        }
    }

    if counter.is_some() {
        generated.assets.push((
            VIEW_COUNTER_JS.to_string(),
            script::generate_view_counter_js().as_bytes().to_vec(),
        ));
    }

    tracing::info!(
        pages = generated.pages.len(),
        assets = generated.assets.len(),
        "site generated"
    );

    generated
}

fn counter_markup(site: &Site, options: GenerateOptions) -> Option<CounterMarkup> {
    let increment_on_view = site.views.as_ref().is_none_or(|v| v.increment_on_view);
    if options.is_preview {
        // preview answers /views/{slug} itself
        return Some(CounterMarkup {
            endpoint: String::new(),
            increment_on_view,
        });
    }
    site.views.as_ref().map(|views| CounterMarkup {
        endpoint: views.endpoint.clone(),
        increment_on_view,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_kit_core::config::parse_site_toml_str;
    use blog_kit_core::{Body, ContentRecord, Locale, PublishedAt, Slug};

    const SITE: &str = r#"
[site]
title = "Test Blog"
base_url = "https://blog.example.com"
default_locale = "en"
locales = ["en", "fr"]

[views]
endpoint = "https://views.example.com"
"#;

    fn record(slug: &str, language: &str, date: &str) -> ContentRecord {
        ContentRecord {
            slug: Slug::parse(slug).unwrap(),
            language: Locale::parse(language).unwrap(),
            title: format!("Title {} {}", slug, language),
            description: "desc".to_string(),
            published_at: PublishedAt::parse(date).unwrap(),
            body: Body::new("Some **bold** text"),
        }
    }

    fn index() -> ContentIndex {
        ContentIndex::new(vec![
            record("a", "en", "2024-01-01"),
            record("a", "fr", "2024-01-02"),
            record("b", "en", "2024-03-01"),
        ])
        .unwrap()
    }

    fn paths(site: &GeneratedSite) -> Vec<&str> {
        site.pages.iter().map(|(p, _)| p.as_str()).collect()
    }

    #[test]
    fn test_strict_policy_pages() {
        let site = parse_site_toml_str(SITE).unwrap();
        let generated = generate_site(&site, &index(), GenerateOptions::default());

        let paths = paths(&generated);
        assert!(paths.contains(&"index.html"));
        assert!(paths.contains(&"404.html"));
        assert!(paths.contains(&"en/blog/index.html"));
        assert!(paths.contains(&"fr/blog/index.html"));
        assert!(paths.contains(&"en/blog/a/index.html"));
        assert!(paths.contains(&"en/blog/b/index.html"));
        assert!(paths.contains(&"fr/blog/a/index.html"));
        assert!(!paths.contains(&"fr/blog/b/index.html"));
        assert!(generated.asset(VIEW_COUNTER_JS).is_some());
    }

    #[test]
    fn test_fallback_policy_renders_mismatch_warning() {
        let toml = format!("{}\n[content]\nlocale_policy = \"fallback\"\n", SITE);
        let site = parse_site_toml_str(&toml).unwrap();
        let generated = generate_site(&site, &index(), GenerateOptions::default());

        let page = generated.page("fr/blog/b/index.html").unwrap();
        assert!(page.contains("Title b en"));
        assert!(page.contains("callout-warning"));

        let exact = generated.page("fr/blog/a/index.html").unwrap();
        assert!(!exact.contains("callout-warning"));
    }

    #[test]
    fn test_listing_order_and_filter() {
        let site = parse_site_toml_str(SITE).unwrap();
        let generated = generate_site(&site, &index(), GenerateOptions::default());

        let listing = generated.page("en/blog/index.html").unwrap();
        let b = listing.find("Title b en").unwrap();
        let a = listing.find("Title a en").unwrap();
        assert!(b < a, "newest first");
        assert!(!listing.contains("Title a fr"));
    }

    #[test]
    fn test_no_counter_without_views_config() {
        let toml = SITE.replace("[views]\nendpoint = \"https://views.example.com\"\n", "");
        let site = parse_site_toml_str(&toml).unwrap();
        let generated = generate_site(&site, &index(), GenerateOptions::default());

        assert!(generated.asset(VIEW_COUNTER_JS).is_none());
        let page = generated.page("en/blog/a/index.html").unwrap();
        assert!(!page.contains("view-counter"));
    }

    #[test]
    fn test_preview_uses_same_origin_counter() {
        let toml = SITE.replace("[views]\nendpoint = \"https://views.example.com\"\n", "");
        let site = parse_site_toml_str(&toml).unwrap();
        let generated = generate_site(&site, &index(), GenerateOptions { is_preview: true });

        assert!(generated.asset(VIEW_COUNTER_JS).is_some());
        let page = generated.page("en/blog/a/index.html").unwrap();
        assert!(page.contains(r#"data-endpoint="""#));
        assert!(page.contains("EventSource"));
    }

    #[test]
    fn test_redirect_targets_default_locale() {
        let site = parse_site_toml_str(SITE).unwrap();
        let generated = generate_site(&site, &index(), GenerateOptions::default());
        assert!(generated.page("index.html").unwrap().contains("/en/blog/"));
    }
}
