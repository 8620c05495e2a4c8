//! List blog content

use anyhow::Result;

use crate::Blog;

/// List blog content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let store = blog.store()?;

    match content_type {
        "article" | "articles" => {
            println!("Articles ({}):", store.len());
            for meta in store.sorted() {
                println!(
                    "  {} - {} [{}]",
                    meta.date.format("%Y-%m-%d"),
                    meta.title,
                    meta.slug
                );
            }
        }
        "tag" | "tags" => {
            let mut tags: std::collections::HashMap<String, usize> =
                std::collections::HashMap::new();
            for meta in store.sorted() {
                for tag in &meta.tags {
                    *tags.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: article, tag", content_type);
        }
    }

    Ok(())
}
