//! minhified: a self-hosted blog engine
//!
//! Resolves markdown articles by slug through a prebuilt content store,
//! derives document/open-graph metadata, and composes article pages that
//! show a loading skeleton until the content resolves.

pub mod commands;
pub mod compose;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod meta;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Articles directory
    pub content_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("site.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    /// Build the article store by scanning the content directory
    pub fn store(&self) -> Result<content::ArticleStore> {
        content::ArticleStore::build(self)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
