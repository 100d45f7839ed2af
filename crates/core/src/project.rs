use crate::index::ContentIndex;
use crate::types::ContentRecord;

/// Records in `locale`, newest first.
///
/// Other languages are dropped entirely. Records published at the same
/// moment keep their index order (`sort_by` is stable).
pub fn project<'a>(index: &'a ContentIndex, locale: &str) -> Vec<&'a ContentRecord> {
    let mut posts: Vec<&ContentRecord> = index
        .records()
        .iter()
        .filter(|record| record.language == *locale)
        .collect();
    posts.sort_by(|a, b| b.published_at.instant().cmp(&a.published_at.instant()));
    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Body, Locale, PublishedAt, Slug};

    fn record(slug: &str, language: &str, date: &str) -> ContentRecord {
        ContentRecord {
            slug: Slug::parse(slug).unwrap(),
            language: Locale::parse(language).unwrap(),
            title: slug.to_string(),
            description: String::new(),
            published_at: PublishedAt::parse(date).unwrap(),
            body: Body::default(),
        }
    }

    fn slugs(posts: &[&ContentRecord]) -> Vec<String> {
        posts.iter().map(|p| p.slug.to_string()).collect()
    }

    #[test]
    fn test_project_example_scenario() {
        let index = ContentIndex::new(vec![
            record("a", "en", "2024-01-01"),
            record("a", "fr", "2024-01-02"),
        ])
        .unwrap();
        let posts = project(&index, "fr");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, *"a");
        assert_eq!(posts[0].language, *"fr");
    }

    #[test]
    fn test_project_filters_and_sorts_descending() {
        let index = ContentIndex::new(vec![
            record("old", "en", "2023-05-01"),
            record("french", "fr", "2025-01-01"),
            record("new", "en", "2024-06-01"),
            record("middle", "en", "2024-01-01"),
        ])
        .unwrap();
        let posts = project(&index, "en");
        assert_eq!(slugs(&posts), ["new", "middle", "old"]);
        assert!(posts.iter().all(|p| p.language == *"en"));
        for pair in posts.windows(2) {
            assert!(pair[0].published_at >= pair[1].published_at);
        }
    }

    #[test]
    fn test_project_is_stable_for_equal_dates() {
        let index = ContentIndex::new(vec![
            record("first", "en", "2024-01-01"),
            record("newer", "en", "2024-02-01"),
            record("second", "en", "2024-01-01"),
            record("third", "en", "2024-01-01"),
        ])
        .unwrap();
        assert_eq!(
            slugs(&project(&index, "en")),
            ["newer", "first", "second", "third"]
        );
    }

    #[test]
    fn test_project_time_of_day_breaks_ties_before_index_order() {
        let index = ContentIndex::new(vec![
            record("morning", "en", "2024-01-01T08:00:00Z"),
            record("evening", "en", "2024-01-01T20:00:00Z"),
        ])
        .unwrap();
        assert_eq!(slugs(&project(&index, "en")), ["evening", "morning"]);
    }

    #[test]
    fn test_project_same_instant_in_different_offsets_keeps_index_order() {
        let index = ContentIndex::new(vec![
            record("taipei", "en", "2024-01-01T08:00:00+08:00"),
            record("utc", "en", "2024-01-01T00:00:00Z"),
        ])
        .unwrap();
        assert_eq!(slugs(&project(&index, "en")), ["taipei", "utc"]);
    }

    #[test]
    fn test_project_unknown_locale_is_empty() {
        let index = ContentIndex::new(vec![record("a", "en", "2024-01-01")]).unwrap();
        assert!(project(&index, "ja").is_empty());
    }
}
