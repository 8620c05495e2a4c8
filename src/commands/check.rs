//! Verify that every indexed article resolves to a body

use anyhow::Result;

use crate::Blog;

/// Check the store invariant: every enumerated slug must load a body.
/// Distinguishes bodies that are missing from bodies that fail to load.
pub fn run(blog: &Blog) -> Result<()> {
    let store = blog.store()?;

    println!("Checking {} articles...", store.len());

    let mut missing = 0;
    let mut failed = 0;

    for meta in store.sorted() {
        match store.load_body(&meta.slug) {
            Ok(Some(_)) => {
                println!("  ok       {}", meta.slug);
            }
            Ok(None) => {
                missing += 1;
                println!("  missing  {}", meta.slug);
            }
            Err(e) => {
                failed += 1;
                println!("  failed   {} ({})", meta.slug, e);
            }
        }
    }

    if missing > 0 || failed > 0 {
        anyhow::bail!(
            "{} missing, {} failed out of {} articles",
            missing,
            failed,
            store.len()
        );
    }

    println!("All articles resolve.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

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
    fn test_check_passes_on_healthy_site() {
        let tmp = TempDir::new().unwrap();
        let blog = test_blog(&tmp);
        let dir = blog.content_dir.join("fine");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("post.md"),
            "---\ntitle: Fine\ndate: 2024-01-01\n---\n\nAll good.\n",
        )
        .unwrap();

        assert!(run(&blog).is_ok());
    }

    #[test]
    fn test_check_passes_on_empty_site() {
        let tmp = TempDir::new().unwrap();
        let blog = test_blog(&tmp);
        assert!(run(&blog).is_ok());
    }
}
