//! Article store - the slug-keyed content index
//!
//! The store is built once by scanning the content directory, so lookups
//! are exact matches against a known set of slugs instead of request-time
//! path construction. Bodies are not kept in the store; they are loaded
//! lazily per slug, independently of the metadata.

use anyhow::Result;
use chrono::Local;
use indexmap::IndexMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ArticleMeta, FrontMatter, LoadError, MarkdownRenderer};
use crate::Blog;

/// One indexed article: scanned metadata plus where its body lives
struct ArticleEntry {
    meta: ArticleMeta,
    body_path: PathBuf,
}

/// Slug-keyed index over the content directory, ordered by date descending
pub struct ArticleStore {
    articles: IndexMap<String, ArticleEntry>,
    renderer: MarkdownRenderer,
}

impl ArticleStore {
    /// Scan the content directory and build the index.
    ///
    /// Both layouts are recognized: `articles/<slug>/post.md` and flat
    /// `articles/<slug>.md`. Files whose front-matter cannot be parsed are
    /// skipped with a warning so that everything the store enumerates is
    /// resolvable.
    pub fn build(blog: &Blog) -> Result<Self> {
        let renderer = MarkdownRenderer::with_options(&blog.config.highlight);
        let content_dir = &blog.content_dir;

        let mut scanned: Vec<ArticleEntry> = Vec::new();

        if content_dir.exists() {
            for entry in WalkDir::new(content_dir)
                .max_depth(2)
                .follow_links(true)
                .into_iter()
                .filter_entry(|e| !is_hidden(e.path()))
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if !path.is_file() || !is_markdown_file(path) {
                    continue;
                }

                let slug = match slug_for(content_dir, path) {
                    Some(slug) => slug,
                    None => continue,
                };

                match load_meta(blog, path, &slug) {
                    Ok(Some(meta)) => scanned.push(ArticleEntry {
                        meta,
                        body_path: path.to_path_buf(),
                    }),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("Skipping article {:?}: {}", path, e);
                    }
                }
            }
        }

        // Newest first; slug as a deterministic tie-break
        scanned.sort_by(|a, b| {
            b.meta
                .date
                .cmp(&a.meta.date)
                .then_with(|| a.meta.slug.cmp(&b.meta.slug))
        });

        let mut articles: IndexMap<String, ArticleEntry> =
            IndexMap::with_capacity(scanned.len());
        for entry in scanned {
            if articles.contains_key(&entry.meta.slug) {
                tracing::warn!(
                    "Duplicate slug {:?}, keeping the newer article",
                    entry.meta.slug
                );
                continue;
            }
            articles.insert(entry.meta.slug.clone(), entry);
        }

        Ok(Self { articles, renderer })
    }

    /// Look up an article by exact slug match
    pub fn article(&self, slug: &str) -> Option<&ArticleMeta> {
        self.articles.get(slug).map(|e| &e.meta)
    }

    /// All known articles, newest first
    pub fn sorted(&self) -> Vec<&ArticleMeta> {
        self.articles.values().map(|e| &e.meta).collect()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Load and render the body for a slug.
    ///
    /// An unknown slug or a body file that has vanished since the scan is
    /// `Ok(None)`; callers treat that as not-found. Content that exists but
    /// cannot be loaded is a `LoadError`.
    pub fn load_body(&self, slug: &str) -> Result<Option<String>, LoadError> {
        let Some(entry) = self.articles.get(slug) else {
            return Ok(None);
        };

        let raw = match fs::read_to_string(&entry.body_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(LoadError::Io {
                    path: entry.body_path.clone(),
                    source: e,
                })
            }
        };

        let (_, body) = FrontMatter::parse(&raw).map_err(|e| LoadError::FrontMatter {
            path: entry.body_path.clone(),
            message: e.to_string(),
        })?;

        let html = self
            .renderer
            .render(body)
            .map_err(|e| LoadError::Render {
                path: entry.body_path.clone(),
                message: e.to_string(),
            })?;

        Ok(Some(html))
    }
}

/// Derive the slug from the storage location: the directory name for
/// `<slug>/post.md`, the file stem for flat `<slug>.md`
fn slug_for(content_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(content_dir).ok()?;
    let mut components = relative.components();
    let first = components.next()?.as_os_str().to_str()?.to_string();

    match components.next() {
        None => Some(first.trim_end_matches(".md").trim_end_matches(".markdown").to_string()),
        Some(file) => {
            let file = file.as_os_str().to_str()?;
            if file == "post.md" || file == "post.markdown" {
                Some(first)
            } else {
                None
            }
        }
    }
}

/// Parse front-matter and assemble ArticleMeta; `Ok(None)` for drafts
fn load_meta(blog: &Blog, path: &Path, slug: &str) -> Result<Option<ArticleMeta>> {
    let content = fs::read_to_string(path)?;
    let (fm, _) = FrontMatter::parse(&content)?;

    if !fm.published && !blog.config.render_drafts {
        return Ok(None);
    }

    let metadata = fs::metadata(path)?;
    let file_modified = metadata
        .modified()
        .ok()
        .map(chrono::DateTime::<Local>::from);

    let date = fm
        .parse_date()
        .unwrap_or_else(|| file_modified.unwrap_or_else(Local::now));

    let title = fm.title.unwrap_or_else(|| slug.to_string());

    let source = path
        .strip_prefix(&blog.content_dir)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();

    let mut meta = ArticleMeta::new(slug.to_string(), title, date, source);
    meta.preview = fm.preview.unwrap_or_default();
    meta.tags = fm.tags;
    meta.image = fm.image;
    let rel = format!("articles/{}/", slug);
    meta.path = crate::helpers::url_for(&blog.config, &rel);
    meta.permalink = crate::helpers::full_url_for(&blog.config, &rel);

    Ok(Some(meta))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.') || n.starts_with('_'))
        .unwrap_or(false)
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
