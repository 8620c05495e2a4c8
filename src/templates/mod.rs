//! Built-in page templates using the Tera template engine
//!
//! All templates are embedded directly in the binary; there is no external
//! theme directory to resolve at runtime.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::content::HeroImage;

/// Template renderer with the embedded template set
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Article bodies and highlighted code are already HTML; text fields
        // are escaped explicitly in the templates instead
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("index.html", include_str!("builtin/index.html")),
            ("article.html", include_str!("builtin/article.html")),
            ("article_shell.html", include_str!("builtin/article_shell.html")),
            ("article_fill.html", include_str!("builtin/article_fill.html")),
            (
                "article_unavailable.html",
                include_str!("builtin/article_unavailable.html"),
            ),
            (
                "article_failed.html",
                include_str!("builtin/article_failed.html"),
            ),
            ("not_found.html", include_str!("builtin/not_found.html")),
            // Partials
            (
                "partials/head.html",
                include_str!("builtin/partials/head.html"),
            ),
            (
                "partials/article_header.html",
                include_str!("builtin/partials/article_header.html"),
            ),
            (
                "partials/fill_tail.html",
                include_str!("builtin/partials/fill_tail.html"),
            ),
            (
                "partials/footer.html",
                include_str!("builtin/partials/footer.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub owner: String,
    pub language: String,
    pub url: String,
    pub root: String,
}

/// A resolved article as the templates see it
#[derive(Debug, Clone, Serialize)]
pub struct ArticleView {
    pub slug: String,
    pub title: String,
    pub date_display: String,
    pub preview: String,
    pub tags: Vec<String>,
    pub image: Option<HeroImage>,
    pub path: String,
}
