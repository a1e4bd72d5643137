//! Content loader - reads the posts index and post files from the site

use std::fs;
use std::io;

use super::{MarkdownRenderer, Post, PostRecord, PostsIndex};
use crate::error::{Error, Result};
use crate::Blog;

/// Loads the posts index and renders post files
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    pub fn new(blog: &'a Blog) -> Self {
        Self {
            blog,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Read `posts/index.json`
    pub fn load_index(&self) -> Result<PostsIndex> {
        let path = self.blog.index_path();
        let json = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                Error::NotFound(format!("posts index {}", path.display()))
            }
            _ => Error::Io(e),
        })?;

        let index = PostsIndex::from_json(&json)?;
        tracing::debug!("Loaded {} records from {:?}", index.len(), path);
        Ok(index)
    }

    /// Render the post with the given id
    pub fn load_post(&self, id: &str) -> Result<Post> {
        let index = self.load_index()?;
        let record = index
            .find(id)
            .ok_or_else(|| Error::NotFound("post not found".to_string()))?;
        self.render_post(record.clone())
    }

    /// Render every post in the index, newest first.
    /// Posts whose file cannot be read are skipped with a warning.
    pub fn load_posts(&self, index: &PostsIndex) -> Vec<Post> {
        let mut posts = Vec::new();

        for record in index.sorted_by_date() {
            match self.render_post(record.clone()) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Failed to load post {}: {}", record.id, e);
                }
            }
        }

        posts
    }

    fn render_post(&self, record: PostRecord) -> Result<Post> {
        let path = self.blog.posts_dir.join(&record.file);
        let markdown = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound(format!("post file {}", path.display())),
            _ => Error::Io(e),
        })?;

        tracing::debug!("Rendering {:?}", path);
        let rendered = self.renderer.render(&markdown);

        Ok(Post {
            record,
            metadata: rendered.metadata,
            content: rendered.html,
        })
    }
}
