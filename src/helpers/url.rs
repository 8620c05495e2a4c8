//! URL helper functions

use crate::config::SiteConfig;

/// Generate a URL path with the site root applied
///
/// # Examples
/// ```ignore
/// url_for(&config, "articles/hello-world/") // -> "/articles/hello-world/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the site host
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "articles/hello-world/")
/// // -> "https://minhified.codes/articles/hello-world/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com".to_string(),
            root: "/blog/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(
            url_for(&config, "articles/hello/"),
            "/blog/articles/hello/"
        );
        assert_eq!(url_for(&config, ""), "/blog/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/articles/hello/"),
            "https://example.com/blog/articles/hello/"
        );
    }

    #[test]
    fn test_default_root() {
        let config = SiteConfig::default();
        assert_eq!(url_for(&config, "articles/x/"), "/articles/x/");
    }
}
