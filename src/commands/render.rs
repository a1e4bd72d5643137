//! Render one markdown file

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::content::MarkdownRenderer;

/// Render a file to HTML, or to the full `{metadata, html}` result as JSON
pub fn render_file(path: &Path, json: bool) -> Result<String> {
    let markdown =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let rendered = MarkdownRenderer::new().render(&markdown);
    tracing::debug!(
        "Rendered {:?}: {} metadata entries",
        path,
        rendered.metadata.len()
    );

    if json {
        Ok(serde_json::to_string_pretty(&rendered)?)
    } else {
        Ok(rendered.html)
    }
}

pub fn run(path: &Path, json: bool) -> Result<()> {
    println!("{}", render_file(path, json)?);
    Ok(())
}
