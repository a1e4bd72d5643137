//! URL helper functions

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::SiteConfig;

lazy_static! {
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^a-z0-9_\s-]").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref DASH_RUN: Regex = Regex::new(r"-+").unwrap();
}

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/posts/hello.html") // -> "/blog/posts/hello.html"
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

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Derive a post id from a title: lowercase, drop everything but word
/// characters, whitespace and dashes, then turn whitespace runs into a
/// single dash.
///
/// # Examples
/// ```ignore
/// slugify("Hello, World!") // -> "hello-world"
/// ```
pub fn slugify(title: &str) -> String {
    let lower = title.trim().to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(&lower, "");
    let dashed = WHITESPACE_RUN.replace_all(&cleaned, "-");
    DASH_RUN.replace_all(&dashed, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/blog/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/posts/a.html"), "/blog/posts/a.html");
        assert_eq!(url_for(&config, ""), "/blog/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "posts/a.html"),
            "https://example.com/blog/posts/a.html"
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("Rust  in   2024"), "rust-in-2024");
        assert_eq!(slugify("Cloud -- Native: A Guide"), "cloud-native-a-guide");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }
}
