//! Print one post's rendered HTML

use anyhow::Result;

use crate::content::ContentLoader;
use crate::Blog;

pub fn run(blog: &Blog, id: &str) -> Result<()> {
    let post = ContentLoader::new(blog).load_post(id)?;
    tracing::info!("{} ({})", post.record.title, post.record.display_date());
    println!("{}", post.content);
    Ok(())
}
