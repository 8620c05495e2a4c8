//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Blog;

/// Clean the public directory
pub fn run(blog: &Blog) -> Result<()> {
    if blog.public_dir.exists() {
        fs::remove_dir_all(&blog.public_dir)?;
        tracing::info!("Deleted: {:?}", blog.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_public_dir() {
        let tmp = TempDir::new().unwrap();
        let base_dir = tmp.path().to_path_buf();
        let config = SiteConfig::default();
        let public_dir = base_dir.join(&config.public_dir);
        fs::create_dir_all(public_dir.join("articles")).unwrap();

        let blog = Blog {
            content_dir: base_dir.join(&config.content_dir),
            public_dir: public_dir.clone(),
            base_dir,
            config,
        };

        run(&blog).unwrap();
        assert!(!public_dir.exists());
        // cleaning twice is fine
        run(&blog).unwrap();
    }
}
