//! Request a post draft from the chat-completion API

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::{draft_file_name, DraftClient, DraftRequest};
use crate::Blog;

/// Write a draft into `dir`, named after its title
pub fn save_draft(dir: &Path, markdown: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(draft_file_name(markdown));
    fs::write(&path, markdown)?;
    Ok(path)
}

/// Generate a draft and save it to `output`, or print it when no directory is given
pub async fn run(
    blog: &Blog,
    request: &DraftRequest,
    api_key: Option<String>,
    output: Option<&Path>,
) -> Result<()> {
    let client = DraftClient::new(blog.config.llm.clone(), api_key);
    let markdown = client.generate(request).await?;

    match output {
        Some(dir) => {
            let path = save_draft(dir, &markdown)?;
            tracing::info!("Saved draft to {:?}", path);
            println!("{}", path.display());
        }
        None => println!("{}", markdown),
    }

    Ok(())
}
