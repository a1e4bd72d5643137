//! Markdown rendering
//!
//! Rendering happens in two passes. The block pass walks the body line by
//! line and produces [`Block`] nodes; the inline pass then runs over the text
//! of every non-code block. Fenced code never reaches the inline pass, and a
//! line that became a block is never matched again by a later rule.

use serde::Serialize;

use super::FrontMatter;
use crate::helpers::{escape_attr, html_escape};

const FENCE: &str = "```";

/// Block-level tags that pass through untouched when a line already starts with one
const RAW_BLOCK_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "blockquote", "hr", "table", "pre", "div",
];

/// Result of rendering one markdown document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    /// Front-matter entries; empty when the document has none
    pub metadata: FrontMatter,
    /// HTML fragment for the body
    pub html: String,
}

/// A line-level construct produced by the block pass
#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Code { lang: Option<String>, body: String },
    Heading { level: usize, text: String },
    Quote(String),
    Rule,
    ListItem { indent: usize, ordered: bool, text: String },
    Html(String),
    Paragraph(String),
    Blank,
}

/// Markdown renderer
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    ordered_lists: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer. Numbered lists render as `<ol>`.
    pub fn new() -> Self {
        Self {
            ordered_lists: true,
        }
    }

    /// Create with custom settings; with `ordered_lists` off every list is a `<ul>`
    pub fn with_options(ordered_lists: bool) -> Self {
        Self { ordered_lists }
    }

    /// Render a document, splitting off its front matter first
    pub fn render(&self, markdown: &str) -> Rendered {
        let normalized = markdown.replace("\r\n", "\n");
        let (metadata, body) = FrontMatter::parse(&normalized);
        let html = self.render_body(body);
        Rendered { metadata, html }
    }

    /// Render markdown without front matter handling
    pub fn render_body(&self, body: &str) -> String {
        let blocks = tokenize(body);
        self.emit(&blocks)
    }

    fn emit(&self, blocks: &[Block]) -> String {
        let mut out: Vec<String> = Vec::new();
        let mut i = 0;

        while i < blocks.len() {
            match &blocks[i] {
                Block::Blank => {
                    // Collapse blank runs; never lead with one
                    if out.last().is_some_and(|l| !l.is_empty()) {
                        out.push(String::new());
                    }
                    i += 1;
                }
                Block::ListItem { .. } => {
                    let end = self.list_end(blocks, i);
                    out.push(self.render_list(&blocks[i..end]));
                    i = end;
                }
                block => {
                    out.push(render_block(block));
                    i += 1;
                }
            }
        }

        while out.last().is_some_and(|l| l.is_empty()) {
            out.pop();
        }

        out.join("\n")
    }

    fn is_ordered(&self, block: &Block) -> bool {
        matches!(block, Block::ListItem { ordered: true, .. }) && self.ordered_lists
    }

    /// Index one past the last item of the list starting at `start`.
    /// A top-level item with the other marker kind opens a new list.
    fn list_end(&self, blocks: &[Block], start: usize) -> usize {
        let ordered = self.is_ordered(&blocks[start]);
        let mut end = start + 1;

        while let Some(block) = blocks.get(end) {
            let Block::ListItem { indent, .. } = block else {
                break;
            };
            if *indent == 0 && self.is_ordered(block) != ordered {
                break;
            }
            end += 1;
        }

        end
    }

    fn render_list(&self, items: &[Block]) -> String {
        let tag = if self.is_ordered(&items[0]) { "ol" } else { "ul" };
        let mut html = format!("<{}>\n", tag);

        for item in items {
            if let Block::ListItem { indent, text, .. } = item {
                html.push_str(&"  ".repeat(*indent));
                html.push_str("<li>");
                html.push_str(&render_inline(text));
                html.push_str("</li>\n");
            }
        }

        html.push_str(&format!("</{}>", tag));
        html
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Code {
            lang: Some(lang),
            body,
        } => format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_attr(lang),
            html_escape(body)
        ),
        Block::Code { lang: None, body } => {
            format!("<pre><code>{}</code></pre>", html_escape(body))
        }
        Block::Heading { level, text } => {
            format!("<h{0}>{1}</h{0}>", level, render_inline(text))
        }
        Block::Quote(text) => format!("<blockquote>{}</blockquote>", render_inline(text)),
        Block::Rule => "<hr>".to_string(),
        Block::Html(raw) => raw.clone(),
        Block::Paragraph(text) => format!("<p>{}</p>", render_inline(text)),
        // Lists and blanks are laid out by the caller
        Block::ListItem { text, .. } => format!("<li>{}</li>", render_inline(text)),
        Block::Blank => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Block pass
// ---------------------------------------------------------------------------

fn tokenize(body: &str) -> Vec<Block> {
    let lines: Vec<&str> = body.split('\n').collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some(lang) = fence_open(line) {
            // An unclosed fence runs to the end of the document
            let close = (i + 1..lines.len())
                .find(|&j| lines[j].trim() == FENCE)
                .unwrap_or(lines.len());
            let body = lines[i + 1..close].join("\n");
            blocks.push(Block::Code { lang, body });
            i = close + 1;
            continue;
        }

        blocks.push(classify(line));
        i += 1;
    }

    blocks
}

/// Classify a single non-fence line, in precedence order
fn classify(line: &str) -> Block {
    if line.trim().is_empty() {
        return Block::Blank;
    }
    if let Some(block) = heading(line) {
        return block;
    }
    if let Some(block) = quote(line) {
        return block;
    }
    if is_rule(line) {
        return Block::Rule;
    }
    if let Some(block) = list_item(line) {
        return block;
    }
    if is_raw_block_html(line) {
        return Block::Html(line.trim_end().to_string());
    }
    Block::Paragraph(line.trim().to_string())
}

/// Language tag of an opening fence line (`None` when absent), or `None` for other lines
#[allow(clippy::option_option)]
fn fence_open(line: &str) -> Option<Option<String>> {
    let rest = line.trim().strip_prefix(FENCE)?;
    if rest.contains('`') {
        return None;
    }
    Some(rest.split_whitespace().next().map(str::to_string))
}

fn heading(line: &str) -> Option<Block> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some(Block::Heading {
        level,
        text: text.to_string(),
    })
}

fn quote(line: &str) -> Option<Block> {
    let rest = line.strip_prefix('>')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some(Block::Quote(text.to_string()))
}

fn is_rule(line: &str) -> bool {
    let line = line.trim_end();
    let Some(first) = line.chars().next() else {
        return false;
    };
    matches!(first, '-' | '_' | '*') && line.len() >= 3 && line.chars().all(|c| c == first)
}

fn list_item(line: &str) -> Option<Block> {
    let spaces = line.chars().take_while(|&c| c == ' ').count();
    let rest = &line[spaces..];

    let (ordered, text) = if let Some(text) = rest
        .strip_prefix(['-', '*', '+'])
        .and_then(|r| r.strip_prefix(' '))
    {
        (false, text)
    } else {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        let text = rest[digits..].strip_prefix(". ")?;
        (true, text)
    };

    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Some(Block::ListItem {
        indent: spaces / 2,
        ordered,
        text: text.to_string(),
    })
}

fn is_raw_block_html(line: &str) -> bool {
    let Some(tag) = line.trim_start().strip_prefix('<') else {
        return false;
    };
    let tag = tag.strip_prefix('/').unwrap_or(tag);
    let name: String = tag
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    let after = &tag[name.len()..];

    RAW_BLOCK_TAGS.contains(&name.as_str())
        && (after.is_empty() || after.starts_with(['>', '/', ' ', '\t']))
}

// ---------------------------------------------------------------------------
// Inline pass
// ---------------------------------------------------------------------------

/// Render inline spans: code, images, links, bold and italic
fn render_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        match c {
            '`' => {
                if let Some((code, after)) = code_span(rest) {
                    out.push_str("<code>");
                    out.push_str(&html_escape(code));
                    out.push_str("</code>");
                    rest = after;
                    continue;
                }
            }
            '!' => {
                if let Some((alt, url, after)) = link_parts(&rest[1..]) {
                    out.push_str(&format!(
                        r#"<img src="{}" alt="{}" loading="lazy">"#,
                        escape_attr(url),
                        escape_attr(alt)
                    ));
                    rest = after;
                    continue;
                }
            }
            '[' => {
                if let Some((label, url, after)) = link_parts(rest) {
                    out.push_str(&format!(
                        r#"<a href="{}">{}</a>"#,
                        escape_attr(url),
                        render_inline(label)
                    ));
                    rest = after;
                    continue;
                }
            }
            '*' => {
                if let Some((inner, after)) = strong(rest) {
                    out.push_str("<strong>");
                    out.push_str(&render_inline(inner));
                    out.push_str("</strong>");
                    rest = after;
                    continue;
                }
                if let Some((inner, after)) = emphasis(rest) {
                    out.push_str("<em>");
                    out.push_str(&render_inline(inner));
                    out.push_str("</em>");
                    rest = after;
                    continue;
                }
            }
            _ => {}
        }

        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// `` `code` `` at the start of `s`
fn code_span(s: &str) -> Option<(&str, &str)> {
    let body = s.strip_prefix('`')?;
    let close = body.find('`')?;
    if close == 0 {
        return None;
    }
    Some((&body[..close], &body[close + 1..]))
}

/// `[label](url)` at the start of `s`, as (label, url, remainder)
fn link_parts(s: &str) -> Option<(&str, &str, &str)> {
    let body = s.strip_prefix('[')?;
    let close = find_outside_code(body, "]")?;
    let label = &body[..close];
    if label.is_empty() || label.contains('[') {
        return None;
    }
    let target = body[close + 1..].strip_prefix('(')?;
    let end = target.find(')')?;
    let url = target[..end].trim();
    if url.is_empty() {
        return None;
    }
    Some((label, url, &target[end + 1..]))
}

/// `**inner**` at the start of `s`
fn strong(s: &str) -> Option<(&str, &str)> {
    let body = s.strip_prefix("**")?;
    let mut close = find_outside_code(body, "**")?;
    // `***x***`: the closer is the last two stars of the run
    if body[close + 2..].starts_with('*') {
        close += 1;
    }
    let inner = &body[..close];
    if !hugs_text(inner) {
        return None;
    }
    Some((inner, &body[close + 2..]))
}

/// `*inner*` at the start of `s`; `**` pairs and code spans inside are skipped over
fn emphasis(s: &str) -> Option<(&str, &str)> {
    let body = s.strip_prefix('*')?;
    if body.starts_with('*') {
        return None;
    }
    let mut i = 0;

    while i < body.len() {
        let rest = &body[i..];
        if rest.starts_with("**") {
            i += 2;
            continue;
        }
        if let Some(after) = rest.strip_prefix('*') {
            let inner = &body[..i];
            if hugs_text(inner) {
                return Some((inner, after));
            }
            i += 1;
            continue;
        }
        if let Some((_, after)) = code_span(rest) {
            i = body.len() - after.len();
            continue;
        }
        i += rest.chars().next().map_or(1, char::len_utf8);
    }

    None
}

/// Byte offset of the first `pat` in `s` that is not inside a code span
fn find_outside_code(s: &str, pat: &str) -> Option<usize> {
    let mut i = 0;

    while i < s.len() {
        let rest = &s[i..];
        if rest.starts_with(pat) {
            return Some(i);
        }
        if let Some((_, after)) = code_span(rest) {
            i = s.len() - after.len();
            continue;
        }
        i += rest.chars().next().map_or(1, char::len_utf8);
    }

    None
}

/// Non-empty, with no whitespace directly inside the delimiters
fn hugs_text(inner: &str) -> bool {
    !inner.is_empty()
        && !inner.starts_with(char::is_whitespace)
        && !inner.ends_with(char::is_whitespace)
}
