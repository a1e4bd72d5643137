//! Generate static files

use anyhow::Result;

use crate::content::{ContentLoader, PostsIndex};
use crate::error::Error;
use crate::generator::Generator;
use crate::Blog;

/// Generate the static site
pub fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(blog);
    let index = match loader.load_index() {
        Ok(index) => index,
        Err(Error::NotFound(what)) => {
            tracing::warn!("{} not found; generating an empty site", what);
            PostsIndex::default()
        }
        Err(e) => return Err(e.into()),
    };
    let posts = loader.load_posts(&index);

    tracing::info!("Loaded {} of {} posts", posts.len(), index.len());

    let generator = Generator::new(blog)?;
    generator.generate(&index, &posts)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    #[test]
    fn test_generate_without_index() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        run(&blog).unwrap();

        let html = std::fs::read_to_string(blog.public_dir.join("index.html")).unwrap();
        assert!(html.contains("No blog posts found."));
    }

    #[test]
    fn test_generate_rejects_broken_index() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        std::fs::create_dir_all(&blog.posts_dir).unwrap();
        std::fs::write(blog.index_path(), "{").unwrap();
        assert!(run(&blog).is_err());
    }
}
