//! Article metadata model

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub use super::frontmatter::HeroImage;

/// Metadata for a single article, built once when the store is scanned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleMeta {
    /// URL-safe identifier, derived from the storage location
    pub slug: String,

    /// Article title
    pub title: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Short preview text, used as the page description
    pub preview: String,

    /// Article tags
    pub tags: Vec<String>,

    /// Optional hero image
    pub image: Option<HeroImage>,

    /// Source file path relative to the content directory
    pub source: String,

    /// URL path (without the site host)
    pub path: String,

    /// Full permalink URL
    pub permalink: String,
}

impl ArticleMeta {
    /// Create article metadata with derived url fields filled in
    pub fn new(slug: String, title: String, date: DateTime<Local>, source: String) -> Self {
        Self {
            slug,
            title,
            date,
            preview: String::new(),
            tags: Vec::new(),
            image: None,
            source,
            path: String::new(),
            permalink: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_defaults() {
        let date = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let meta = ArticleMeta::new(
            "hello-world".into(),
            "Hello World".into(),
            date,
            "hello-world/post.md".into(),
        );
        assert_eq!(meta.slug, "hello-world");
        assert!(meta.tags.is_empty());
        assert!(meta.image.is_none());
    }
}
