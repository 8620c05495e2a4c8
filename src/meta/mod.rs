//! Document metadata derivation
//!
//! Turns resolved article metadata into the structured document description
//! consumed by the page head and by external link-preview renderers.

use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::ArticleMeta;

/// Author attribution
#[derive(Debug, Clone, Serialize)]
pub struct Author {
    pub name: String,
    pub url: String,
}

/// Open-graph block
#[derive(Debug, Clone, Serialize)]
pub struct OpenGraph {
    /// Open-graph object type ("article" or "website")
    pub kind: String,
    pub title: String,
    pub description: String,
    /// Image sources; empty when the article has no hero image
    pub images: Vec<String>,
}

/// Structured document description: head title, description, authors, and
/// the open-graph block
#[derive(Debug, Clone, Serialize)]
pub struct DocumentMeta {
    pub title: String,
    pub description: String,
    pub authors: Vec<Author>,
    pub open_graph: OpenGraph,
}

impl DocumentMeta {
    /// Derive document metadata for a resolved article.
    ///
    /// The head title is the site owner joined with the article title; the
    /// open-graph image list carries exactly the hero image source when one
    /// is present.
    pub fn for_article(config: &SiteConfig, article: &ArticleMeta) -> Self {
        let title = format!("{} | {}", config.owner, article.title);
        let description = article.preview.clone();
        let images = article
            .image
            .as_ref()
            .map(|image| vec![image.src.clone()])
            .unwrap_or_default();

        Self {
            title: title.clone(),
            description: description.clone(),
            authors: vec![Author {
                name: config.owner.clone(),
                url: config.url.clone(),
            }],
            open_graph: OpenGraph {
                kind: "article".to_string(),
                title,
                description,
                images,
            },
        }
    }

    /// Derive document metadata for the site index
    pub fn for_site(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            authors: vec![Author {
                name: config.owner.clone(),
                url: config.url.clone(),
            }],
            open_graph: OpenGraph {
                kind: "website".to_string(),
                title: config.title.clone(),
                description: config.description.clone(),
                images: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::HeroImage;
    use chrono::{Local, TimeZone};

    fn article(title: &str) -> ArticleMeta {
        let date = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut meta = ArticleMeta::new(
            "hello-world".into(),
            title.into(),
            date,
            "hello-world/post.md".into(),
        );
        meta.preview = "intro text".into();
        meta.tags = vec!["intro".into()];
        meta
    }

    #[test]
    fn test_title_prefix() {
        let config = SiteConfig::default();
        let doc = DocumentMeta::for_article(&config, &article("Hello World"));
        assert_eq!(doc.title, "Minh Ha | Hello World");
        assert_eq!(doc.open_graph.title, "Minh Ha | Hello World");
        assert_eq!(doc.description, "intro text");
        assert_eq!(doc.open_graph.kind, "article");
    }

    #[test]
    fn test_author_attribution() {
        let config = SiteConfig::default();
        let doc = DocumentMeta::for_article(&config, &article("Hello World"));
        assert_eq!(doc.authors.len(), 1);
        assert_eq!(doc.authors[0].name, "Minh Ha");
        assert_eq!(doc.authors[0].url, "https://minhified.codes");
    }

    #[test]
    fn test_no_image_means_no_og_images() {
        let config = SiteConfig::default();
        let doc = DocumentMeta::for_article(&config, &article("Hello World"));
        assert!(doc.open_graph.images.is_empty());
    }

    #[test]
    fn test_og_images_carry_exactly_the_source() {
        let config = SiteConfig::default();
        let mut meta = article("Hello World");
        meta.image = Some(HeroImage {
            src: "cover.jpg".into(),
            width: Some(1200),
            height: Some(630),
        });
        let doc = DocumentMeta::for_article(&config, &meta);
        assert_eq!(doc.open_graph.images, vec!["cover.jpg"]);
    }

    #[test]
    fn test_site_metadata() {
        let config = SiteConfig::default();
        let doc = DocumentMeta::for_site(&config);
        assert_eq!(doc.title, "Minhified");
        assert_eq!(doc.open_graph.kind, "website");
    }
}
