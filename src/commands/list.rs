//! List posts from the index

use anyhow::Result;

use crate::content::{ContentLoader, PostFilter, PostRecord, PostsIndex};
use crate::Blog;

/// Posts matching the filter, newest first, cut to the `featured` most recent
pub fn select<'a>(
    index: &'a PostsIndex,
    filter: &PostFilter,
    featured: Option<usize>,
) -> Vec<&'a PostRecord> {
    let mut posts = index.filter(filter);
    if let Some(count) = featured {
        posts.truncate(count);
    }
    posts
}

fn format_line(post: &PostRecord) -> String {
    let mut line = format!("  {} - {} [{}]", post.date, post.title, post.id);
    if let Some(category) = &post.category {
        line.push_str(&format!(" ({})", category));
    }
    if !post.tags.is_empty() {
        line.push_str(&format!(" #{}", post.tags.join(" #")));
    }
    line
}

/// List posts newest first
pub fn run(blog: &Blog, filter: &PostFilter, featured: bool) -> Result<()> {
    let index = ContentLoader::new(blog).load_index()?;
    let featured = featured.then_some(blog.config.featured_count);
    let posts = select(&index, filter, featured);

    if posts.is_empty() {
        println!("No blog posts found.");
        return Ok(());
    }

    println!("Posts ({}):", posts.len());
    for post in posts {
        println!("{}", format_line(post));
    }

    Ok(())
}
