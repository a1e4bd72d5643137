//! blogsmith: a static blog toolkit
//!
//! The crate renders markdown posts with front matter, keeps a JSON posts
//! index, generates a static site from it with embedded Tera templates,
//! drafts posts through a chat-completion API and publishes them to a GitHub
//! repository through the Contents API.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod github;
pub mod helpers;
pub mod llm;
pub mod publish;
pub mod server;
pub mod templates;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

/// A blog site rooted at a directory
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the markdown posts and the index
    pub posts_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Static assets copied into the output
    pub assets_dir: PathBuf,
}

impl Blog {
    /// Open the site in `base_dir`, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let posts_dir = base_dir.join(&config.posts_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let assets_dir = base_dir.join(&config.assets_dir);

        Self {
            config,
            base_dir,
            posts_dir,
            public_dir,
            assets_dir,
        }
    }

    /// Local path of the posts index
    pub fn index_path(&self) -> PathBuf {
        self.posts_dir.join(&self.config.index_file)
    }

    /// Initialize a new site
    pub fn init(&self) -> anyhow::Result<()> {
        commands::init::run(self)
    }

    /// Generate the static site
    pub fn generate(&self) -> anyhow::Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }
}
