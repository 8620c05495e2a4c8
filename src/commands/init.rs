//! Initialize a new blog

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Blog;

/// Initialize a new blog in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("articles"))?;

    let config_content = r#"# Site
title: Minhified
description: Notes on software and everything around it
owner: Minh Ha
language: en

# URL
url: https://minhified.codes
root: /

# Directory
content_dir: articles
public_dir: public

# Writing
render_drafts: false

# Display
date_format: DD/MM/YYYY
highlight:
  theme: base16-ocean.dark
  line_numbers: false
"#;

    fs::write(target_dir.join("site.yml"), config_content)?;

    // Create a sample article
    let now = chrono::Local::now();
    let sample_article = format!(
        r#"---
title: Hello World
date: {}
preview: The first article on this blog.
tags:
  - intro
---

Welcome! This is your very first article.

## Quick start

Create a new article:

```bash
$ minhified new "My New Article"
```

Start the dev server:

```bash
$ minhified serve
```

Generate static files:

```bash
$ minhified generate
```
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    let sample_dir = target_dir.join("articles/hello-world");
    fs::create_dir_all(&sample_dir)?;
    fs::write(sample_dir.join("post.md"), sample_article)?;

    Ok(())
}

/// Run the init command with an existing Blog instance
pub fn run(blog: &Blog) -> Result<()> {
    init_site(&blog.base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_resolvable_site() {
        let tmp = TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();

        assert!(tmp.path().join("site.yml").exists());

        let blog = Blog::new(tmp.path()).unwrap();
        let store = blog.store().unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.article("hello-world").is_some());
        assert!(store.load_body("hello-world").unwrap().is_some());
    }
}
