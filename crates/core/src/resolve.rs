//! Single-article lookup by slug and locale.
//!
//! [`resolve`] is exact-match only. [`resolve_with_policy`] lets the caller
//! opt into a cross-locale fallback; the result then says whether the record
//! it found is in a different language than the one requested, and rendering
//! a warning for that is left to the caller.

use crate::index::ContentIndex;
use crate::types::{ContentRecord, Locale};
use serde::Deserialize;
use thiserror::Error;

/// No record exists for the requested slug and locale.
///
/// Maps to a "page not found" outcome at the routing boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No article '{slug}' for locale '{locale}'")]
pub struct NotFound {
    pub slug: String,
    pub locale: String,
}

impl NotFound {
    fn new(slug: &str, locale: &str) -> Self {
        Self {
            slug: slug.to_string(),
            locale: locale.to_string(),
        }
    }
}

/// What to do when a slug exists but not in the requested locale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocalePolicy {
    /// Requested locale only; anything else is `NotFound`
    #[default]
    Strict,
    /// Requested locale, then the default locale, then any locale
    Fallback,
}

/// A resolved record and whether its language differs from the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub record: &'a ContentRecord,
    pub locale_mismatch: bool,
}

/// Exact match on `(slug, locale)`.
///
/// The returned reference points into `index`; nothing is copied.
pub fn resolve<'a>(
    index: &'a ContentIndex,
    slug: &str,
    locale: &str,
) -> Result<&'a ContentRecord, NotFound> {
    index.get(slug, locale).ok_or_else(|| NotFound::new(slug, locale))
}

/// Resolve under `policy`, reporting a language mismatch explicitly.
pub fn resolve_with_policy<'a>(
    index: &'a ContentIndex,
    slug: &str,
    locale: &str,
    policy: LocalePolicy,
    default_locale: &Locale,
) -> Result<Resolution<'a>, NotFound> {
    if let Some(record) = index.get(slug, locale) {
        return Ok(Resolution {
            record,
            locale_mismatch: false,
        });
    }

    if policy == LocalePolicy::Strict {
        return Err(NotFound::new(slug, locale));
    }

    index
        .get(slug, default_locale.as_str())
        .or_else(|| index.translations(slug).into_iter().next())
        .map(|record| Resolution {
            record,
            locale_mismatch: record.language != *locale,
        })
        .ok_or_else(|| NotFound::new(slug, locale))
}
