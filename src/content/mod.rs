//! Content module - front matter, markdown rendering and the posts index

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::{MarkdownRenderer, Rendered};
pub use post::{Post, PostFilter, PostRecord, PostsIndex};
