//! Initialize a new blog site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::{PostRecord, PostsIndex};
use crate::helpers::today;
use crate::Blog;

const CONFIG: &str = r#"# Blog Configuration

# Site
title: My Blog
description: ''
author: John Doe
language: en

# URL
url: http://example.com
root: /

# Directory
posts_dir: posts
index_file: index.json
public_dir: public
assets_dir: assets

# Listing
featured_count: 3
related_count: 3
excerpt_length: 150
default_image: assets/images/default-post.jpg
author_image: assets/images/author.jpg

# Publishing (token comes from --token or GITHUB_TOKEN)
github:
  owner: ''
  repo: ''
  branch: main
  api_base: https://api.github.com

# Drafting (key comes from --api-key or LLM_API_KEY)
llm:
  endpoint: https://models.github.ai/inference/chat/completions
  model: openai/gpt-4.1
  temperature: 1.0
  top_p: 1.0
  author: AI Content Writer
"#;

const STYLE: &str = r#"body { font-family: system-ui, sans-serif; margin: 0; color: #222; }
.container { max-width: 1100px; margin: 0 auto; padding: 0 1rem; }
.navbar, .footer { background: #1d2d44; color: #fff; padding: 1rem 0; }
.navbar a { color: #fff; text-decoration: none; margin-right: 1rem; }
.featured-post-img, .card-img-top { object-fit: cover; max-height: 220px; }
.blog-post { border: 1px solid #e5e5e5; border-radius: 6px; margin-bottom: 1.5rem; }
.badge { background: #6c757d; color: #fff; padding: 0.2rem 0.5rem; border-radius: 4px; }
.author-bio { display: flex; gap: 1rem; border-top: 1px solid #e5e5e5; padding-top: 1rem; }
.author-img { width: 64px; height: 64px; border-radius: 50%; }
pre { background: #f6f8fa; padding: 1rem; overflow-x: auto; }
"#;

/// Initialize a new site in the given directory.
/// Existing files are left alone.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("posts"))?;
    fs::create_dir_all(target_dir.join("assets/css"))?;
    fs::create_dir_all(target_dir.join("assets/images"))?;

    write_if_missing(&target_dir.join("_config.yml"), CONFIG)?;
    write_if_missing(&target_dir.join("assets/css/style.css"), STYLE)?;

    let date = today();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
author: John Doe
tags: [welcome, markdown]
category: General
excerpt: Your very first post.
---

# Hello World

Welcome to your new blog! Posts are **markdown** files with a front-matter header.

## Writing

- Add a file under `posts/`
- Add its record to `posts/index.json`
- Run `blogsmith generate`

## Drafting and publishing

1. `blogsmith draft --topic "..."` asks a model for a draft
2. `blogsmith publish <file>` commits it to your GitHub repository
"#,
        date
    );
    write_if_missing(&target_dir.join("posts/hello-world.md"), &sample_post)?;

    let mut record = PostRecord::new("hello-world", "Hello World", date);
    record.author = Some("John Doe".to_string());
    record.tags = vec!["welcome".to_string(), "markdown".to_string()];
    record.category = Some("General".to_string());
    record.excerpt = Some("Your very first post.".to_string());
    let index = PostsIndex::new(vec![record]);
    write_if_missing(&target_dir.join("posts/index.json"), &index.to_json()?)?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::info!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, content)?;
    tracing::debug!("Created {:?}", path);
    Ok(())
}

/// Run the init command with an existing blog instance
pub fn run(blog: &Blog) -> Result<()> {
    init_site(&blog.base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use tempfile::TempDir;

    #[test]
    fn test_init_site_is_loadable() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "My Blog");
        assert_eq!(blog.config.github.branch, "main");

        let post = ContentLoader::new(&blog).load_post("hello-world").unwrap();
        assert_eq!(post.metadata.tags(), vec!["welcome", "markdown"]);
        assert!(post.content.starts_with("<h1>Hello World</h1>"));
        assert!(post.content.contains("<ol>\n<li><code>blogsmith draft"));
    }

    #[test]
    fn test_init_keeps_existing_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(dir.path().join("posts/index.json"), "[]").unwrap();

        init_site(dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("posts/index.json")).unwrap(),
            "[]"
        );
    }
}
