use blog_kit_core::{Locale, PublishedAt};

/// Region assumed for a bare language tag when the locale tables need one
fn default_region(language: &str) -> String {
    match language {
        "en" => "US".to_string(),
        "zh" => "CN".to_string(),
        "ja" => "JP".to_string(),
        "ko" => "KR".to_string(),
        "sv" => "SE".to_string(),
        "da" => "DK".to_string(),
        "uk" => "UA".to_string(),
        "cs" => "CZ".to_string(),
        "el" => "GR".to_string(),
        "he" => "IL".to_string(),
        "vi" => "VN".to_string(),
        other => other.to_ascii_uppercase(),
    }
}

/// Map a site locale tag (`zh-TW`, `fr`) onto chrono's locale tables.
/// Unknown tags format with POSIX (English) names.
pub fn chrono_locale(locale: &Locale) -> chrono::Locale {
    let mut parts = locale.as_str().split('-');
    let language = parts.next().unwrap_or_default().to_ascii_lowercase();
    let region = parts.next().map(str::to_ascii_uppercase);

    let mut candidates = Vec::new();
    if let Some(region) = region {
        candidates.push(format!("{}_{}", language, region));
    }
    candidates.push(format!("{}_{}", language, default_region(&language)));

    candidates
        .iter()
        .find_map(|name| chrono::Locale::try_from(name.as_str()).ok())
        .unwrap_or(chrono::Locale::POSIX)
}

/// Visible publication date in `locale`, using the author's own calendar day
pub fn display_date(published_at: &PublishedAt, format: &str, locale: &Locale) -> String {
    published_at
        .date()
        .format_localized(format, chrono_locale(locale))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(tag: &str) -> Locale {
        Locale::parse(tag).unwrap()
    }

    #[test]
    fn test_chrono_locale_mapping() {
        assert_eq!(chrono_locale(&locale("en")), chrono::Locale::en_US);
        assert_eq!(chrono_locale(&locale("zh-TW")), chrono::Locale::zh_TW);
        assert_eq!(chrono_locale(&locale("fr")), chrono::Locale::fr_FR);
        assert_eq!(chrono_locale(&locale("xx")), chrono::Locale::POSIX);
    }

    #[test]
    fn test_display_date_uses_locale_month_names() {
        let date = PublishedAt::parse("2024-03-05").unwrap();
        assert_eq!(display_date(&date, "%B %-d, %Y", &locale("en")), "March 5, 2024");
        assert_eq!(display_date(&date, "%-d %B %Y", &locale("fr")), "5 mars 2024");
    }

    #[test]
    fn test_display_date_keeps_authored_day() {
        let date = PublishedAt::parse("2024-03-05T01:30:00+08:00").unwrap();
        assert_eq!(
            display_date(&date, "%Y年%-m月%-d日", &locale("zh-TW")),
            "2024年3月5日"
        );
    }
}
