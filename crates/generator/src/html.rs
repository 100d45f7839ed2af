use pulldown_cmark::{Options, Parser, html};

/// HTML-escape a string to prevent XSS attacks
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#x27;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Render an article body from markdown
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Page chrome shared by every generated page
pub struct Layout<'a> {
    pub lang: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    /// Extra `<head>` markup, already escaped
    pub head: String,
    /// Whether to load the view-counter script
    pub counter_script: Option<&'a str>,
    pub is_preview: bool,
}

impl Layout<'_> {
    pub fn wrap(&self, main: &str) -> String {
        let counter_script = match self.counter_script {
            Some(endpoint) => format!(
                r#"<script src="/view-counter.js" data-endpoint="{}" defer></script>"#,
                html_escape(endpoint)
            ),
            None => String::new(),
        };

        let reload_script = if self.is_preview {
            r#"<script>new EventSource('/_reload').onmessage = () => location.reload();</script>"#
        } else {
            ""
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta name="description" content="{description}">
{head}
<style>
body {{ max-width: 42rem; margin: 2rem auto; padding: 0 1rem; font-family: system-ui, sans-serif; line-height: 1.6; }}
.meta {{ display: flex; justify-content: space-between; font-size: 0.875rem; opacity: 0.7; }}
.callout-warning {{ border-left: 4px solid #e0a800; padding: 0.5rem 1rem; background: #fff8e1; }}
.post-list {{ list-style: none; padding: 0; }}
.post-list li {{ margin-bottom: 1.5rem; }}
</style>
</head>
<body>
<main>
{main}
</main>
{counter_script}
{reload_script}
</body>
</html>
"#,
            lang = html_escape(self.lang),
            title = html_escape(self.title),
            description = html_escape(self.description),
            head = self.head,
            main = main,
            counter_script = counter_script,
            reload_script = reload_script,
        )
    }
}
