use crate::GenerateOptions;
use crate::dates::display_date;
use crate::html::{Layout, html_escape, render_markdown};
use blog_kit_core::{ContentIndex, ContentRecord, Locale, Resolution, Site};

/// How counters are emitted into pages
#[derive(Debug, Clone)]
pub struct CounterMarkup {
    /// Store base URL; empty means same origin
    pub endpoint: String,
    pub increment_on_view: bool,
}

impl CounterMarkup {
    fn span(&self, record: &ContentRecord, increment: bool, label: &str) -> String {
        format!(
            r#"<span><span class="view-counter" data-slug="{}" data-increment="{}">-</span> {}</span>"#,
            html_escape(record.slug.as_str()),
            increment && self.increment_on_view,
            html_escape(label)
        )
    }
}

fn layout<'a>(
    lang: &'a str,
    title: &'a str,
    description: &'a str,
    head: String,
    options: GenerateOptions,
    counter: Option<&'a CounterMarkup>,
) -> Layout<'a> {
    Layout {
        lang,
        title,
        description,
        head,
        counter_script: counter.map(|c| c.endpoint.as_str()),
        is_preview: options.is_preview,
    }
}

/// Post list for one locale, newest first
pub fn listing_page(
    site: &Site,
    locale: &Locale,
    posts: &[&ContentRecord],
    options: GenerateOptions,
    counter: Option<&CounterMarkup>,
) -> String {
    let messages = site.messages(locale);

    let mut items = String::new();
    for post in posts {
        let views = counter
            .map(|c| c.span(post, false, &messages.post_views))
            .unwrap_or_default();
        items.push_str(&format!(
            r#"<li>
<a href="{url}"><h2>{title}</h2></a>
<div class="meta"><time datetime="{iso}">{date}</time>{views}</div>
<p>{description}</p>
</li>
"#,
            url = html_escape(&post.url(locale)),
            title = html_escape(&post.title),
            iso = post.published_at.machine(),
            date = display_date(&post.published_at, &messages.date_format, locale),
            views = views,
            description = html_escape(&post.description),
        ));
    }

    let description = if site.metadata.description.is_empty() {
        String::new()
    } else {
        format!("<p>{}</p>\n", html_escape(&site.metadata.description))
    };

    let main = format!(
        r#"<h1>{heading}</h1>
{description}<p class="post-count">{count}</p>
<ul class="post-list">
{items}</ul>"#,
        heading = html_escape(&messages.blog),
        description = description,
        count = html_escape(&messages.post_count(posts.len())),
        items = items,
    );

    let head = format!(
        r#"<link rel="canonical" href="{}/{}/blog/">"#,
        html_escape(&site.metadata.base_url),
        locale
    );

    let title = format!("{} | {}", messages.blog, site.metadata.title);
    layout(
        locale.as_str(),
        &title,
        &site.metadata.description,
        head,
        options,
        counter,
    )
    .wrap(&main)
}

/// One article rendered at `/{locale}/blog/{slug}/`
pub fn article_page(
    site: &Site,
    index: &ContentIndex,
    locale: &Locale,
    resolution: Resolution<'_>,
    options: GenerateOptions,
    counter: Option<&CounterMarkup>,
) -> String {
    let record = resolution.record;
    let messages = site.messages(locale);

    let callout = if resolution.locale_mismatch {
        format!(
            r#"<div class="callout-warning" role="note">{}</div>"#,
            html_escape(&messages.no_translation)
        )
    } else {
        String::new()
    };

    let views = counter
        .map(|c| c.span(record, true, &messages.post_views))
        .unwrap_or_default();

    let translations: Vec<String> = index
        .translations(record.slug.as_str())
        .into_iter()
        .filter(|t| t.language != record.language && site.metadata.locales.contains(&t.language))
        .map(|t| {
            format!(
                r#"<a href="{}" hreflang="{}">{}</a>"#,
                html_escape(&t.url(&t.language)),
                t.language,
                t.language
            )
        })
        .collect();
    let translations = if translations.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="translations">{}</p>"#, translations.join(" · "))
    };

    let main = format!(
        r#"<a href="/{locale}/blog/">&larr; {back}</a>
{callout}
<h1>{title}</h1>
<div class="meta"><time datetime="{iso}">{date}</time>{views}</div>
{translations}
<article lang="{lang}">
{body}
</article>"#,
        locale = locale,
        back = html_escape(&messages.back_to_blog),
        callout = callout,
        title = html_escape(&record.title),
        iso = record.published_at.machine(),
        date = display_date(&record.published_at, &messages.date_format, locale),
        views = views,
        translations = translations,
        lang = record.language,
        body = render_markdown(record.body.as_str()),
    );

    let url = format!("{}{}", site.metadata.base_url, record.url(locale));
    let head = format!(
        r#"<link rel="canonical" href="{url}">
<meta property="og:type" content="article">
<meta property="og:title" content="{title}">
<meta property="og:description" content="{description}">
<meta property="og:url" content="{url}">
<meta property="article:published_time" content="{published}">"#,
        url = html_escape(&url),
        title = html_escape(&record.title),
        description = html_escape(&record.description),
        published = record.published_at.machine(),
    );

    layout(
        locale.as_str(),
        &record.title,
        &record.description,
        head,
        options,
        counter,
    )
    .wrap(&main)
}

pub fn not_found_page(site: &Site, options: GenerateOptions) -> String {
    let locale = &site.metadata.default_locale;
    let messages = site.messages(locale);
    let main = format!(
        r#"<h1>404</h1>
<p>{}</p>
<a href="/{}/blog/">&larr; {}</a>"#,
        html_escape(&messages.not_found),
        locale,
        html_escape(&messages.back_to_blog)
    );
    layout(
        locale.as_str(),
        &messages.not_found,
        &site.metadata.description,
        String::new(),
        options,
        None,
    )
    .wrap(&main)
}

/// Root page forwarding to the default locale's blog
pub fn redirect_page(target: &str) -> String {
    let target = html_escape(target);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="0; url={target}">
<link rel="canonical" href="{target}">
</head>
<body><a href="{target}">{target}</a></body>
</html>
"#
    )
}
