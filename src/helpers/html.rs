//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape a value placed inside a double-quoted attribute.
///
/// Only the quote is touched; the rest of the value is trusted content.
pub fn escape_attr(s: &str) -> String {
    s.replace('"', "&quot;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Build a plain-text excerpt from rendered HTML: the first `length`
/// characters of its text, followed by `...`
pub fn excerpt_from_html(html: &str, length: usize) -> String {
    let text = strip_html(html);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let head: String = text.chars().take(length).collect();
    format!("{}...", head)
}
