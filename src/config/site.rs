//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub posts_dir: String,
    pub index_file: String,
    pub public_dir: String,
    pub assets_dir: String,

    // Listing
    pub featured_count: usize,
    pub related_count: usize,
    pub excerpt_length: usize,
    pub default_image: String,
    pub author_image: String,

    // Publishing
    #[serde(default)]
    pub github: GitHubConfig,

    // Drafting
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            posts_dir: "posts".to_string(),
            index_file: "index.json".to_string(),
            public_dir: "public".to_string(),
            assets_dir: "assets".to_string(),

            featured_count: 3,
            related_count: 3,
            excerpt_length: 150,
            default_image: "assets/images/default-post.jpg".to_string(),
            author_image: "assets/images/author.jpg".to_string(),

            github: GitHubConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Repository path of the posts index (e.g. `posts/index.json`)
    pub fn index_path(&self) -> String {
        format!(
            "{}/{}",
            self.posts_dir.trim_end_matches('/'),
            self.index_file
        )
    }

    /// Repository path of a post file (e.g. `posts/hello.md`)
    pub fn post_path(&self, file: &str) -> String {
        format!("{}/{}", self.posts_dir.trim_end_matches('/'), file)
    }
}

/// Target repository for publishing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub api_base: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            branch: "main".to_string(),
            api_base: "https://api.github.com".to_string(),
        }
    }
}

/// Chat-completion endpoint used for drafting posts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    /// Author written into the front-matter template of generated drafts
    pub author: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://models.github.ai/inference/chat/completions".to_string(),
            model: "openai/gpt-4.1".to_string(),
            temperature: 1.0,
            top_p: 1.0,
            author: "AI Content Writer".to_string(),
        }
    }
}
