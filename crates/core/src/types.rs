use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// URL-safe article identifier, unique within one language
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Parse a slug: lowercase ASCII letters, digits, `-` and `_` only
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidData("Slug must not be empty".to_string()));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(Error::InvalidData(format!(
                "Invalid slug '{}': use lowercase letters, digits, '-' or '_'",
                s
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Slug::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Slug {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Language tag such as `en` or `zh-TW`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    pub fn parse(s: &str) -> Result<Self> {
        let valid = !s.is_empty()
            && !s.starts_with('-')
            && !s.ends_with('-')
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(Error::InvalidData(format!("Invalid locale tag '{}'", s)));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Locale {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Locale::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Locale {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Publication timestamp as authored. Ordering follows the instant in
/// time; display uses the author's own calendar date and offset.
#[derive(Debug, Clone, Copy)]
pub struct PublishedAt {
    authored: DateTime<FixedOffset>,
    date_only: bool,
}

impl PublishedAt {
    /// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(date.into());
        }
        DateTime::parse_from_rfc3339(s)
            .map(|authored| Self {
                authored,
                date_only: false,
            })
            .map_err(|e| Error::InvalidData(format!("Invalid published_at '{}': {}", s, e)))
    }

    /// Calendar date in the author's offset
    pub fn date(&self) -> NaiveDate {
        self.authored.date_naive()
    }

    /// Timestamp in the author's offset
    pub fn authored(&self) -> DateTime<FixedOffset> {
        self.authored
    }

    /// The instant used for ordering
    pub fn instant(&self) -> DateTime<Utc> {
        self.authored.with_timezone(&Utc)
    }

    /// ISO date (`YYYY-MM-DD`) in the author's offset
    pub fn iso_date(&self) -> String {
        self.date().format("%Y-%m-%d").to_string()
    }

    /// Machine-readable form for `<time datetime>` and meta tags: the date
    /// alone when no time was given, otherwise RFC 3339 with the offset kept
    pub fn machine(&self) -> String {
        if self.date_only {
            self.iso_date()
        } else {
            self.authored.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        }
    }

    fn sort_key(&self) -> (DateTime<Utc>, i32, bool) {
        (
            self.instant(),
            self.authored.offset().local_minus_utc(),
            self.date_only,
        )
    }
}

impl PartialEq for PublishedAt {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for PublishedAt {}

impl PartialOrd for PublishedAt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PublishedAt {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl Hash for PublishedAt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl From<NaiveDate> for PublishedAt {
    fn from(date: NaiveDate) -> Self {
        Self {
            authored: date.and_time(NaiveTime::MIN).and_utc().fixed_offset(),
            date_only: true,
        }
    }
}

/// Renderable article payload. The core never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Body(String);

impl Body {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One article in one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    pub slug: Slug,
    pub language: Locale,
    pub title: String,
    pub description: String,
    pub published_at: PublishedAt,
    pub body: Body,
}

impl ContentRecord {
    /// Site-relative URL of this record rendered in `locale`
    pub fn url(&self, locale: &Locale) -> String {
        format!("/{}/blog/{}/", locale, self.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_parse() {
        assert!(Slug::parse("hello-world").is_ok());
        assert!(Slug::parse("rust_2024").is_ok());
        assert!(Slug::parse("").is_err());
        assert!(Slug::parse("Hello").is_err());
        assert!(Slug::parse("a/b").is_err());
        assert!(Slug::parse("../etc").is_err());
    }

    #[test]
    fn test_locale_parse() {
        assert!(Locale::parse("en").is_ok());
        assert!(Locale::parse("zh-TW").is_ok());
        assert!(Locale::parse("").is_err());
        assert!(Locale::parse("-en").is_err());
        assert!(Locale::parse("en_US").is_err());
    }

    #[test]
    fn test_published_at_date_only() {
        let date = PublishedAt::parse("2024-01-02").unwrap();
        assert_eq!(date.iso_date(), "2024-01-02");
        assert_eq!(date.machine(), "2024-01-02");
        assert_eq!(date.authored().time(), NaiveTime::MIN);
    }

    #[test]
    fn test_published_at_keeps_authored_date_and_offset() {
        let date = PublishedAt::parse("2024-03-05T01:30:00+08:00").unwrap();
        assert_eq!(date.iso_date(), "2024-03-05");
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(date.machine(), "2024-03-05T01:30:00+08:00");
        assert_eq!(
            date.instant().naive_utc().date(),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
    }

    #[test]
    fn test_published_at_orders_by_instant() {
        // 01:30 in Taipei is the previous evening in UTC
        let taipei = PublishedAt::parse("2024-03-05T01:30:00+08:00").unwrap();
        let utc_midnight = PublishedAt::parse("2024-03-05").unwrap();
        let utc_evening = PublishedAt::parse("2024-03-04T18:00:00Z").unwrap();
        assert!(taipei < utc_midnight);
        assert!(utc_evening > taipei);
        assert!(PublishedAt::parse("2024-01-01").unwrap() < taipei);
    }

    #[test]
    fn test_published_at_rejects_garbage() {
        assert!(PublishedAt::parse("yesterday").is_err());
        assert!(PublishedAt::parse("2024-13-01").is_err());
    }

    #[test]
    fn test_record_url() {
        let record = ContentRecord {
            slug: Slug::parse("hello").unwrap(),
            language: Locale::parse("en").unwrap(),
            title: "Hello".to_string(),
            description: String::new(),
            published_at: PublishedAt::parse("2024-01-01").unwrap(),
            body: Body::default(),
        };
        assert_eq!(record.url(&Locale::parse("fr").unwrap()), "/fr/blog/hello/");
    }
}
