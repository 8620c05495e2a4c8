//! Page composer
//!
//! Turns resolved content into documents: a metadata head plus a body
//! region. Article pages are composed either in one pass (static output) or
//! in two phases: an immediate shell carrying fixed-size skeleton blocks,
//! then a fill fragment that swaps the resolved content in once loading
//! completes.

use anyhow::Result;
use chrono::{Datelike, Local};
use tera::Context;

use crate::config::SiteConfig;
use crate::content::ArticleMeta;
use crate::helpers::format_date;
use crate::meta::DocumentMeta;
use crate::templates::{ArticleView, ConfigData, TemplateRenderer};

/// Composes pages from the embedded template set
pub struct PageComposer {
    config: SiteConfig,
    renderer: TemplateRenderer,
}

impl PageComposer {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Create a base context with common variables
    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: self.config.title.clone(),
                description: self.config.description.clone(),
                owner: self.config.owner.clone(),
                language: self.config.language.clone(),
                url: self.config.url.clone(),
                root: self.config.root.clone(),
            },
        );
        context.insert("current_year", &Local::now().year().to_string());
        context
    }

    fn article_view(&self, meta: &ArticleMeta) -> ArticleView {
        ArticleView {
            slug: meta.slug.clone(),
            title: meta.title.clone(),
            date_display: format_date(&meta.date, &self.config.date_format),
            preview: meta.preview.clone(),
            tags: meta.tags.clone(),
            image: meta.image.clone(),
            path: meta.path.clone(),
        }
    }

    /// First response phase: document head plus the skeleton placeholder.
    /// The markup is intentionally left open so the fill phase can complete
    /// the document.
    pub fn article_shell(&self, doc: &DocumentMeta) -> Result<String> {
        let mut context = self.base_context();
        context.insert("meta", doc);
        self.renderer.render("article_shell.html", &context)
    }

    /// Second response phase: resolved content that replaces the skeleton
    pub fn article_fill(&self, meta: &ArticleMeta, body: &str) -> Result<String> {
        let mut context = self.base_context();
        context.insert("article", &self.article_view(meta));
        context.insert("body", body);
        self.renderer.render("article_fill.html", &context)
    }

    /// Second response phase for a body that resolved to absent
    pub fn article_unavailable(&self) -> Result<String> {
        let context = self.base_context();
        self.renderer.render("article_unavailable.html", &context)
    }

    /// Second response phase for a body that failed to load
    pub fn article_failed(&self) -> Result<String> {
        let context = self.base_context();
        self.renderer.render("article_failed.html", &context)
    }

    /// Single-pass article page, used for static output
    pub fn article_page(
        &self,
        doc: &DocumentMeta,
        meta: &ArticleMeta,
        body: &str,
    ) -> Result<String> {
        let mut context = self.base_context();
        context.insert("meta", doc);
        context.insert("article", &self.article_view(meta));
        context.insert("body", body);
        self.renderer.render("article.html", &context)
    }

    /// Article index page, newest first
    pub fn index_page(&self, articles: &[&ArticleMeta]) -> Result<String> {
        let doc = DocumentMeta::for_site(&self.config);
        let views: Vec<ArticleView> = articles.iter().map(|m| self.article_view(m)).collect();

        let mut context = self.base_context();
        context.insert("meta", &doc);
        context.insert("articles", &views);
        self.renderer.render("index.html", &context)
    }

    /// The not-found page
    pub fn not_found_page(&self) -> Result<String> {
        let doc = DocumentMeta::for_site(&self.config);
        let mut context = self.base_context();
        context.insert("meta", &doc);
        self.renderer.render("not_found.html", &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::HeroImage;
    use chrono::TimeZone;

    fn hello_world() -> ArticleMeta {
        let date = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut meta = ArticleMeta::new(
            "hello-world".into(),
            "Hello World".into(),
            date,
            "hello-world/post.md".into(),
        );
        meta.preview = "intro text".into();
        meta.tags = vec!["intro".into()];
        meta.path = "/articles/hello-world/".into();
        meta
    }

    fn composer() -> PageComposer {
        PageComposer::new(&SiteConfig::default()).unwrap()
    }

    #[test]
    fn test_shell_has_metadata_and_skeleton() {
        let composer = composer();
        let doc = DocumentMeta::for_article(&SiteConfig::default(), &hello_world());
        let shell = composer.article_shell(&doc).unwrap();

        assert!(shell.contains("<title>Minh Ha | Hello World</title>"));
        assert!(shell.contains(r#"<meta property="og:type" content="article">"#));
        assert!(shell.contains("skeleton-title"));
        assert!(shell.contains("skeleton-hero"));
        // left open for the fill phase
        assert!(!shell.contains("</html>"));
    }

    #[test]
    fn test_shell_og_image_only_when_present() {
        let composer = composer();
        let config = SiteConfig::default();

        let doc = DocumentMeta::for_article(&config, &hello_world());
        let shell = composer.article_shell(&doc).unwrap();
        assert!(!shell.contains("og:image"));

        let mut with_image = hello_world();
        with_image.image = Some(HeroImage {
            src: "cover.jpg".into(),
            width: None,
            height: None,
        });
        let doc = DocumentMeta::for_article(&config, &with_image);
        let shell = composer.article_shell(&doc).unwrap();
        assert!(shell.contains(r#"<meta property="og:image" content="cover.jpg">"#));
    }

    #[test]
    fn test_fill_completes_the_document() {
        let composer = composer();
        let fill = composer
            .article_fill(&hello_world(), "<p>Some content.</p>")
            .unwrap();

        assert!(fill.contains("<p>Some content.</p>"));
        assert!(fill.contains(r#"<span class="tag">intro</span>"#));
        assert!(fill.contains("01/01/2024"));
        assert!(fill.contains("article-content"));
        assert!(fill.contains("</html>"));
        // exactly one tag chip
        assert_eq!(fill.matches(r#"class="tag""#).count(), 1);
    }

    #[test]
    fn test_fill_variants() {
        let composer = composer();
        let unavailable = composer.article_unavailable().unwrap();
        assert!(unavailable.contains("Article not found"));
        assert!(unavailable.contains("</html>"));

        let failed = composer.article_failed().unwrap();
        assert!(failed.contains("could not be loaded"));
    }

    #[test]
    fn test_static_article_page() {
        let composer = composer();
        let config = SiteConfig::default();
        let meta = hello_world();
        let doc = DocumentMeta::for_article(&config, &meta);
        let page = composer
            .article_page(&doc, &meta, "<p>Some content.</p>")
            .unwrap();

        assert!(page.contains("<title>Minh Ha | Hello World</title>"));
        assert!(page.contains(r#"<h1 class="article-title">Hello World</h1>"#));
        assert!(page.contains("<p>Some content.</p>"));
        assert!(!page.contains("skeleton"));
    }

    #[test]
    fn test_index_page() {
        let composer = composer();
        let meta = hello_world();
        let page = composer.index_page(&[&meta]).unwrap();

        assert!(page.contains("Minhified"));
        assert!(page.contains(r#"href="/articles/hello-world/""#));
        assert!(page.contains("Hello World"));
    }

    #[test]
    fn test_not_found_page() {
        let composer = composer();
        let page = composer.not_found_page().unwrap();
        assert!(page.contains("404"));
        assert!(page.contains("does not exist"));
    }
}
