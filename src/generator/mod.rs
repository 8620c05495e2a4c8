//! Generator module - prerenders the site into the public directory
//!
//! Every slug the store enumerates gets a fully resolved page (no skeleton;
//! there is nothing to wait for at build time), alongside the index page,
//! the not-found page, and a manifest of the renderable slug set.

use anyhow::{Context as _, Result};
use std::fs;
use walkdir::WalkDir;

use crate::compose::PageComposer;
use crate::content::ArticleStore;
use crate::meta::DocumentMeta;
use crate::Blog;

/// Static site generator
pub struct Generator {
    blog: Blog,
    composer: PageComposer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let composer = PageComposer::new(&blog.config)?;
        Ok(Self {
            blog: blog.clone(),
            composer,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, store: &ArticleStore) -> Result<()> {
        fs::create_dir_all(&self.blog.public_dir)?;

        self.generate_index(store)?;
        self.generate_articles(store)?;
        self.generate_not_found()?;
        self.generate_manifest(store)?;
        self.copy_article_assets()?;

        Ok(())
    }

    /// Generate the index page
    fn generate_index(&self, store: &ArticleStore) -> Result<()> {
        let html = self.composer.index_page(&store.sorted())?;
        let output_path = self.blog.public_dir.join("index.html");
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Generate one fully resolved page per enumerated slug
    fn generate_articles(&self, store: &ArticleStore) -> Result<()> {
        let mut count = 0;

        for meta in store.sorted() {
            let body = store
                .load_body(&meta.slug)
                .with_context(|| format!("loading body for {}", meta.slug))?;

            let Some(body) = body else {
                // Vanished between scan and generation
                tracing::warn!("No body for {}, skipping", meta.slug);
                continue;
            };

            let doc = DocumentMeta::for_article(&self.blog.config, meta);
            let html = self.composer.article_page(&doc, meta, &body)?;

            let output_path = self
                .blog
                .public_dir
                .join("articles")
                .join(&meta.slug)
                .join("index.html");
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, html)?;
            tracing::debug!("Generated article: {:?}", output_path);
            count += 1;
        }

        tracing::info!("Generated {} article pages", count);
        Ok(())
    }

    /// Generate the 404 page
    fn generate_not_found(&self) -> Result<()> {
        let html = self.composer.not_found_page()?;
        fs::write(self.blog.public_dir.join("404.html"), html)?;
        Ok(())
    }

    /// Write the manifest of all renderable slugs with their metadata
    fn generate_manifest(&self, store: &ArticleStore) -> Result<()> {
        let output_path = self.blog.public_dir.join("articles.json");
        let json = serde_json::to_string_pretty(&store.sorted())?;
        fs::write(&output_path, json)?;
        tracing::info!("Generated articles.json");
        Ok(())
    }

    /// Copy non-markdown files (hero images etc.) next to their articles
    fn copy_article_assets(&self) -> Result<()> {
        let content_dir = &self.blog.content_dir;
        if !content_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str());
            if matches!(ext, Some("md") | Some("markdown")) {
                continue;
            }

            let relative = path.strip_prefix(content_dir)?;
            let dest = self.blog.public_dir.join("articles").join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_article(dir: &Path, slug: &str, front: &str, body: &str) {
        let article_dir = dir.join(slug);
        fs::create_dir_all(&article_dir).unwrap();
        fs::write(
            article_dir.join("post.md"),
            format!("---\n{}---\n\n{}\n", front, body),
        )
        .unwrap();
    }

    fn test_blog(tmp: &TempDir) -> Blog {
        let base_dir = tmp.path().to_path_buf();
        let config = SiteConfig::default();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        fs::create_dir_all(&content_dir).unwrap();
        Blog {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    #[test]
    fn test_generate_site() {
        let tmp = TempDir::new().unwrap();
        let blog = test_blog(&tmp);
        write_article(
            &blog.content_dir,
            "hello-world",
            "title: Hello World\ndate: 2024-01-01\npreview: intro text\ntags: [intro]\n",
            "Some **content**.",
        );
        fs::write(blog.content_dir.join("hello-world/cover.jpg"), b"jpg").unwrap();

        let store = blog.store().unwrap();
        let generator = Generator::new(&blog).unwrap();
        generator.generate(&store).unwrap();

        let page =
            fs::read_to_string(blog.public_dir.join("articles/hello-world/index.html")).unwrap();
        assert!(page.contains("<title>Minh Ha | Hello World</title>"));
        assert!(page.contains("<strong>content</strong>"));

        let index = fs::read_to_string(blog.public_dir.join("index.html")).unwrap();
        assert!(index.contains("hello-world"));

        assert!(blog.public_dir.join("404.html").exists());
        assert!(blog.public_dir.join("articles/hello-world/cover.jpg").exists());
    }

    #[test]
    fn test_manifest_lists_all_slugs() {
        let tmp = TempDir::new().unwrap();
        let blog = test_blog(&tmp);
        write_article(&blog.content_dir, "one", "title: One\ndate: 2024-01-01\n", "a");
        write_article(&blog.content_dir, "two", "title: Two\ndate: 2024-02-01\n", "b");

        let store = blog.store().unwrap();
        let generator = Generator::new(&blog).unwrap();
        generator.generate(&store).unwrap();

        let manifest = fs::read_to_string(blog.public_dir.join("articles.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&manifest).unwrap();
        let slugs: Vec<_> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["slug"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(slugs, vec!["two", "one"]);
    }
}
