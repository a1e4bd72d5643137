//! Publishing a markdown draft: write the post file, then prepend its record
//! to the posts index

use crate::config::SiteConfig;
use crate::content::{FrontMatter, PostRecord, PostsIndex};
use crate::error::{Error, Result};
use crate::github::{ContentStore, FileCommit};
use crate::helpers::{slugify, today};

/// Build the index record for a draft from its front matter
pub fn record_from_front_matter(fm: &FrontMatter) -> Result<PostRecord> {
    let title = fm
        .title()
        .ok_or_else(|| Error::Validation("front matter has no title".to_string()))?;
    let id = slugify(&title);
    if id.is_empty() {
        return Err(Error::Validation(format!(
            "title {:?} does not produce a usable slug",
            title
        )));
    }

    let mut record = PostRecord::new(id, title, fm.date().unwrap_or_else(today));
    record.author = fm.author();
    record.tags = fm.tags();
    record.category = fm.category();
    record.excerpt = fm.excerpt();
    record.image = fm.image();
    Ok(record)
}

/// Publishes drafts into a [`ContentStore`]
pub struct Publisher<S> {
    store: S,
    config: SiteConfig,
}

impl<S: ContentStore> Publisher<S> {
    pub fn new(store: S, config: SiteConfig) -> Self {
        Self { store, config }
    }

    /// Publish a markdown document with front matter. The post file is
    /// written first; the index is only touched once that succeeded.
    pub async fn publish(&self, markdown: &str) -> Result<PostRecord> {
        let normalized = markdown.replace("\r\n", "\n");
        let (fm, _) = FrontMatter::extract(&normalized)
            .ok_or_else(|| Error::Format("invalid markdown front matter".to_string()))?;
        let record = record_from_front_matter(&fm)?;

        let post_path = self.config.post_path(&record.file);
        tracing::info!("Creating {}", post_path);
        self.store
            .put_file(
                &post_path,
                &FileCommit {
                    message: format!("Add new post: {}", record.title),
                    content: markdown.to_string(),
                    sha: None,
                },
            )
            .await
            .map_err(|e| e.with_context("Failed to create markdown file in repository"))?;

        let index_path = self.config.index_path();
        let (mut index, sha) = match self
            .store
            .get_file(&index_path)
            .await
            .map_err(|e| e.with_context(format!("Failed to fetch {}", index_path)))?
        {
            None => {
                tracing::info!("{} not found; a new one will be created", index_path);
                (PostsIndex::default(), None)
            }
            Some(file) => match PostsIndex::from_json(&file.content) {
                Ok(index) => (index, Some(file.sha)),
                Err(e) => {
                    tracing::warn!("Failed to parse {}, starting empty: {}", index_path, e);
                    (PostsIndex::default(), Some(file.sha))
                }
            },
        };

        index.prepend(record.clone());

        tracing::info!("Updating {} ({} posts)", index_path, index.len());
        self.store
            .put_file(
                &index_path,
                &FileCommit {
                    message: format!("Update index.json for new post: {}", record.title),
                    content: index.to_json()?,
                    sha,
                },
            )
            .await
            .map_err(|e| e.with_context("Failed to update index.json in repository"))?;

        Ok(record)
    }
}
