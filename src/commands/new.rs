//! Create a new article

use anyhow::Result;
use std::fs;

use crate::Blog;

/// Create a new article directory with a front-matter scaffold
pub fn run(blog: &Blog, title: &str) -> Result<()> {
    let now = chrono::Local::now();
    let slug = slug::slugify(title);

    let article_dir = blog.content_dir.join(&slug);
    let file_path = article_dir.join("post.md");

    if file_path.exists() {
        anyhow::bail!("Article already exists: {:?}", file_path);
    }

    fs::create_dir_all(&article_dir)?;

    let content = format!(
        r#"---
title: {}
date: {}
preview:
tags:
---
"#,
        title,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn test_blog(tmp: &TempDir) -> Blog {
        let base_dir = tmp.path().to_path_buf();
        let config = SiteConfig::default();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        Blog {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    #[test]
    fn test_new_article_is_indexed() {
        let tmp = TempDir::new().unwrap();
        let blog = test_blog(&tmp);

        run(&blog, "My New Article").unwrap();

        let store = blog.store().unwrap();
        let meta = store.article("my-new-article").unwrap();
        assert_eq!(meta.title, "My New Article");
    }

    #[test]
    fn test_new_refuses_duplicate() {
        let tmp = TempDir::new().unwrap();
        let blog = test_blog(&tmp);

        run(&blog, "Twice").unwrap();
        assert!(run(&blog, "Twice").is_err());
    }
}
