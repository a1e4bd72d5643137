//! Publish a markdown draft to the configured GitHub repository

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::github::GitHubStore;
use crate::publish::Publisher;
use crate::Blog;

pub async fn run(blog: &Blog, file: &Path, token: Option<String>) -> Result<()> {
    let markdown =
        fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))?;

    let store = GitHubStore::new(blog.config.github.clone(), token)?;
    let publisher = Publisher::new(store, blog.config.clone());
    let record = publisher.publish(&markdown).await?;

    println!(
        "Published {:?} to {}/{} as {}",
        record.title,
        blog.config.github.owner,
        blog.config.github.repo,
        blog.config.post_path(&record.file)
    );

    Ok(())
}
