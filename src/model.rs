//! Normalized feed records and the raw field map they are mapped from.
//!
//! Every payload is a fresh owned value: mapping never borrows from the raw
//! map, so payloads can outlive the parse that produced them and cross thread
//! boundaries freely.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors surfaced while mapping raw feed data into payloads.
///
/// A mapping error aborts the single item being mapped; the caller decides
/// whether to skip that item or abandon the whole feed.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A field the payload cannot exist without is absent or empty.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// The feed's homepage link could not be parsed as a URL.
    #[error("homepage link is not a valid URL: {0}")]
    InvalidHomepage(#[from] url::ParseError),
}

// ============================================================================
// Raw Input
// ============================================================================

/// Flattened projection of an XML element's children as string fields.
///
/// Produced by the upstream XML-to-map step. An absent key means the source
/// element was missing, which is distinct from a present-but-empty value.
#[derive(Debug, Clone, Default)]
pub struct RawFieldMap {
    fields: HashMap<String, String>,
}

impl RawFieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Typed required-field access: absent or blank-after-trim fails with
    /// [`MappingError::MissingField`] naming the offending key.
    pub fn required(&self, key: &'static str) -> Result<&str, MappingError> {
        self.get(key)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(MappingError::MissingField(key))
    }
}

impl FromIterator<(String, String)> for RawFieldMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Normalized Output
// ============================================================================

/// A normalized feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    pub link: String,
    /// Plain-text summary reduced from the entry's HTML content fragment.
    pub description: String,
    pub image_url: Option<String>,
    /// Publication time in epoch milliseconds. `0` covers both "unparseable"
    /// and "epoch zero"; callers must not read meaning into the difference.
    pub date: i64,
}

/// A normalized feed with its entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPayload {
    pub name: String,
    /// The feed's website, taken from its own `link` field.
    pub homepage_link: String,
    /// The URL the feed XML was fetched from (not the homepage).
    pub link: String,
    pub description: String,
    /// Resolved icon URL for the feed's homepage host.
    pub icon: String,
    /// Entries in source order.
    pub posts: Vec<PostPayload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_key_is_none() {
        let fields = RawFieldMap::new();
        assert_eq!(fields.get("title"), None);
    }

    #[test]
    fn test_present_empty_value_is_some() {
        let mut fields = RawFieldMap::new();
        fields.insert("title", "");
        assert_eq!(fields.get("title"), Some(""));
    }

    #[test]
    fn test_required_trims_value() {
        let mut fields = RawFieldMap::new();
        fields.insert("link", "  https://example.com  ");
        assert_eq!(fields.required("link").unwrap(), "https://example.com");
    }

    #[test]
    fn test_required_rejects_absent_and_blank() {
        let mut fields = RawFieldMap::new();
        let err = fields.required("link").unwrap_err();
        assert!(matches!(err, MappingError::MissingField("link")));

        fields.insert("link", "   ");
        let err = fields.required("link").unwrap_err();
        assert!(matches!(err, MappingError::MissingField("link")));
    }

    #[test]
    fn test_missing_field_error_names_the_key() {
        let err = MappingError::MissingField("title");
        assert_eq!(err.to_string(), "missing required field 'title'");
    }
}
