//! Front-matter parsing
//!
//! A front-matter block is the text between a first line of exactly `---`
//! and the next line of exactly `---`. Each line inside it is read as
//! `key: value`, split on the first colon. Values are flat strings; list-like
//! values keep their items in one string with the surrounding brackets
//! removed, so `tags: [rust, web]` is stored as `rust, web`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const DELIMITER: &str = "---";

/// Front-matter metadata of a markdown document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter {
    entries: IndexMap<String, String>,
}

impl FrontMatter {
    /// Parse front-matter from content string.
    /// Returns (front_matter, remaining_content); when there is no block the
    /// front matter is empty and the content is returned untouched.
    pub fn parse(content: &str) -> (Self, &str) {
        Self::extract(content).unwrap_or_else(|| (FrontMatter::default(), content))
    }

    /// Like [`FrontMatter::parse`], but `None` when the document has no
    /// delimited block at all
    pub fn extract(content: &str) -> Option<(Self, &str)> {
        let (first, mut rest) = split_line(content);
        if !is_delimiter(first) {
            return None;
        }

        let block_start = content.len() - rest.len();
        while !rest.is_empty() {
            let line_start = content.len() - rest.len();
            let (line, after) = split_line(rest);
            if is_delimiter(line) {
                let block = &content[block_start..line_start];
                return Some((Self::parse_block(block), after));
            }
            rest = after;
        }

        None
    }

    fn parse_block(block: &str) -> Self {
        let mut entries = IndexMap::new();

        for line in block.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = strip_brackets(value.trim());
            if key.is_empty() || value.is_empty() {
                continue;
            }
            entries.insert(key.to_string(), value.to_string());
        }

        Self { entries }
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in the order they appeared in the block
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn title(&self) -> Option<String> {
        self.text("title")
    }

    pub fn date(&self) -> Option<String> {
        self.text("date")
    }

    pub fn author(&self) -> Option<String> {
        self.text("author")
    }

    pub fn category(&self) -> Option<String> {
        self.text("category")
    }

    pub fn excerpt(&self) -> Option<String> {
        self.text("excerpt")
    }

    pub fn image(&self) -> Option<String> {
        self.text("image")
    }

    /// Comma-separated `tags` value as a list
    pub fn tags(&self) -> Vec<String> {
        self.get("tags")
            .map(|raw| {
                raw.split(',')
                    .map(|t| unquote(t.trim()).to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Value with one layer of surrounding quotes removed; `None` when blank
    fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|v| unquote(v).trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Split off the first line, without its newline
fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches('\r') == DELIMITER
}

fn strip_brackets(value: &str) -> &str {
    let value = value.strip_prefix('[').unwrap_or(value);
    value.strip_suffix(']').unwrap_or(value)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frontmatter() {
        let content = "---\ntitle: Hello World\ndate: 2024-01-15\ntags: [rust, web]\n---\n\nThis is the content.\n";

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.get("title"), Some("Hello World"));
        assert_eq!(fm.get("date"), Some("2024-01-15"));
        assert_eq!(fm.get("tags"), Some("rust, web"));
        assert_eq!(fm.tags(), vec!["rust", "web"]);
        assert_eq!(remaining, "\nThis is the content.\n");
    }

    #[test]
    fn test_no_frontmatter_leaves_body_unchanged() {
        let content = "# Heading\n\ntitle: not metadata\n";
        let (fm, remaining) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_unclosed_block_is_not_frontmatter() {
        let content = "---\ntitle: Dangling\n\nBody";
        assert!(FrontMatter::extract(content).is_none());
        let (fm, remaining) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_delimiter_must_be_first_line() {
        let content = "\n---\ntitle: Late\n---\nBody";
        let (fm, remaining) = FrontMatter::parse(content);
        assert!(fm.is_empty());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_split_on_first_colon_and_trim() {
        let content = "---\n  url  :  https://example.com/a  \nno colon here\n: empty key\nblank:\n---\n";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.len(), 1);
        assert_eq!(fm.get("url"), Some("https://example.com/a"));
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_crlf_delimiters() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title(), Some("Windows".to_string()));
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_closing_delimiter_at_end_of_input() {
        let (fm, remaining) = FrontMatter::parse("---\nauthor: Jane\n---");
        assert_eq!(fm.author(), Some("Jane".to_string()));
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_typed_accessors_unquote() {
        let content = "---\ntitle: \"Quoted Title\"\ntags: [\"a\", 'b', , c]\ncategory: Cloud\n---\n";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.title(), Some("Quoted Title".to_string()));
        assert_eq!(fm.get("title"), Some("\"Quoted Title\""));
        assert_eq!(fm.tags(), vec!["a", "b", "c"]);
        assert_eq!(fm.category(), Some("Cloud".to_string()));
        assert_eq!(fm.excerpt(), None);
    }

    #[test]
    fn test_entries_keep_order() {
        let (fm, _) = FrontMatter::parse("---\nb: 2\na: 1\nc: 3\n---\n");
        let keys: Vec<_> = fm.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }
}
