//! Built-in blog templates using the Tera template engine
//!
//! The templates are embedded in the binary, so a site needs no theme
//! directory of its own.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::{escape_attr, long_date, strip_html};

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Rendered post bodies are HTML already
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("macros.html", include_str!("theme/macros.html")),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("long_date", long_date_filter);
        tera.register_filter("attr", attr_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Tera filter: "2024-01-05" -> "January 5, 2024"
fn long_date_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("long_date", "value", String, value);
    Ok(tera::Value::String(long_date(&s)))
}

/// Tera filter: make a value safe inside a double-quoted attribute
fn attr_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("attr", "value", String, value);
    Ok(tera::Value::String(escape_attr(&s)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    /// Home page link; also the prefix for site-relative asset links
    pub root: String,
    /// Resolved URL of the author picture shown in bios
    pub author_image: String,
    pub year: String,
}

/// A post as shown in lists, cards and the post header
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub url: String,
    pub date: String,
    pub author: Option<String>,
    pub category: Option<TermLink>,
    pub tags: Vec<TermLink>,
    pub excerpt: String,
    /// Featured image, or the configured default
    pub image: String,
}

/// A category or tag with its listing page
#[derive(Debug, Clone, Serialize)]
pub struct TermLink {
    pub name: String,
    pub url: String,
}

/// A category or tag in the sidebar
#[derive(Debug, Clone, Serialize)]
pub struct TermData {
    pub name: String,
    pub url: String,
    pub count: usize,
}

/// Open Graph and Twitter card values of a post page
#[derive(Debug, Clone, Serialize)]
pub struct MetaData {
    pub description: String,
    pub og_title: String,
    pub og_url: String,
    pub og_image: Option<String>,
}
