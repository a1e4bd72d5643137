//! Generator module - renders the static site using built-in Tera templates

use anyhow::Result;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{Post, PostFilter, PostRecord, PostsIndex};
use crate::helpers::{full_url_for, url_for};
use crate::templates::{MetaData, PostCard, SiteData, TemplateRenderer, TermData, TermLink};
use crate::Blog;

/// Which kind of listing a term page shows
#[derive(Debug, Clone, Copy)]
enum Term {
    Category,
    Tag,
}

impl Term {
    fn dir(self) -> &'static str {
        match self {
            Term::Category => "category",
            Term::Tag => "tag",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Term::Category => "Category",
            Term::Tag => "Tag",
        }
    }

    fn filter(self, name: &str) -> PostFilter {
        match self {
            Term::Category => PostFilter {
                category: Some(name.to_string()),
                ..Default::default()
            },
            Term::Tag => PostFilter {
                tag: Some(name.to_string()),
                ..Default::default()
            },
        }
    }
}

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Generate the entire site from the index and its loaded posts
    pub fn generate(&self, index: &PostsIndex, posts: &[Post]) -> Result<()> {
        fs::create_dir_all(&self.blog.public_dir)?;

        self.copy_assets()?;

        let site = self.build_site_data();
        let cards: IndexMap<String, PostCard> = posts
            .iter()
            .map(|p| (p.record.id.clone(), self.post_card(p)))
            .collect();

        let categories = self.term_data(Term::Category, index.categories());
        let tags = self.term_data(Term::Tag, index.tags());

        let mut context = Context::new();
        context.insert("site", &site);
        context.insert("categories", &categories);
        context.insert("tags", &tags);

        self.generate_index_page(index, &cards, &context)?;
        self.generate_post_pages(index, posts, &cards, &context)?;
        self.generate_term_pages(Term::Category, index, &cards, &context)?;
        self.generate_term_pages(Term::Tag, index, &cards, &context)?;
        self.generate_search_index(posts)?;

        Ok(())
    }

    fn build_site_data(&self) -> SiteData {
        let config = &self.blog.config;
        SiteData {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            root: url_for(config, ""),
            author_image: self.image_url(Some(&config.author_image)),
            year: chrono::Local::now().format("%Y").to_string(),
        }
    }

    fn post_url(&self, id: &str) -> String {
        url_for(&self.blog.config, &format!("posts/{}.html", id))
    }

    fn term_url(&self, term: Term, name: &str) -> String {
        url_for(
            &self.blog.config,
            &format!("{}/{}.html", term.dir(), slug::slugify(name)),
        )
    }

    /// Site URL of an image, falling back to the default post image
    fn image_url(&self, image: Option<&str>) -> String {
        let image = image.unwrap_or(&self.blog.config.default_image);
        if is_absolute_url(image) {
            image.to_string()
        } else {
            url_for(&self.blog.config, image)
        }
    }

    fn post_card(&self, post: &Post) -> PostCard {
        let record = &post.record;
        PostCard {
            id: record.id.clone(),
            title: record.title.clone(),
            url: self.post_url(&record.id),
            date: record.date.clone(),
            author: record.author.clone(),
            category: record.category.as_ref().map(|name| TermLink {
                name: name.clone(),
                url: self.term_url(Term::Category, name),
            }),
            tags: record
                .tags
                .iter()
                .map(|name| TermLink {
                    name: name.clone(),
                    url: self.term_url(Term::Tag, name),
                })
                .collect(),
            excerpt: post.excerpt(self.blog.config.excerpt_length),
            image: self.image_url(record.image.as_deref()),
        }
    }

    fn term_data(&self, term: Term, counts: Vec<(String, usize)>) -> Vec<TermData> {
        counts
            .into_iter()
            .filter(|(name, _)| !slug::slugify(name).is_empty())
            .map(|(name, count)| TermData {
                url: self.term_url(term, &name),
                name,
                count,
            })
            .collect()
    }

    fn post_meta(&self, record: &PostRecord) -> MetaData {
        let config = &self.blog.config;
        MetaData {
            description: record
                .excerpt
                .clone()
                .unwrap_or_else(|| format!("{} - {}", record.title, config.title)),
            og_title: format!("{} | {}", record.title, config.title),
            og_url: full_url_for(config, &format!("posts/{}.html", record.id)),
            og_image: record.image.as_deref().map(|image| {
                if is_absolute_url(image) {
                    image.to_string()
                } else {
                    full_url_for(config, image)
                }
            }),
        }
    }

    /// Generate index.html: featured posts, every post, categories and tags
    fn generate_index_page(
        &self,
        index: &PostsIndex,
        cards: &IndexMap<String, PostCard>,
        base: &Context,
    ) -> Result<()> {
        let featured = pick_cards(cards, index.featured(self.blog.config.featured_count));
        let posts = pick_cards(cards, index.sorted_by_date());

        let mut context = base.clone();
        context.insert("heading", &None::<String>);
        context.insert("featured", &featured);
        context.insert("posts", &posts);

        let html = self.renderer.render("index.html", &context)?;
        self.write_page(Path::new("index.html"), &html)?;
        tracing::info!("Generated index.html with {} posts", posts.len());

        Ok(())
    }

    /// Generate posts/{id}.html for every loaded post
    fn generate_post_pages(
        &self,
        index: &PostsIndex,
        posts: &[Post],
        cards: &IndexMap<String, PostCard>,
        base: &Context,
    ) -> Result<()> {
        for post in posts {
            let Some(card) = cards.get(&post.record.id) else {
                continue;
            };
            let related = pick_cards(
                cards,
                index.related(&post.record, self.blog.config.related_count),
            );

            let mut context = base.clone();
            context.insert("post", card);
            context.insert("content", &post.content);
            context.insert("meta", &self.post_meta(&post.record));
            context.insert("related", &related);

            let html = self.renderer.render("post.html", &context)?;
            let output = Path::new("posts").join(format!("{}.html", post.record.id));
            self.write_page(&output, &html)?;
            tracing::debug!("Generated post: {:?}", output);
        }

        Ok(())
    }

    /// Generate one listing page per category or tag
    fn generate_term_pages(
        &self,
        term: Term,
        index: &PostsIndex,
        cards: &IndexMap<String, PostCard>,
        base: &Context,
    ) -> Result<()> {
        let names = match term {
            Term::Category => index.categories(),
            Term::Tag => index.tags(),
        };

        for (name, _) in names {
            let slug = slug::slugify(&name);
            if slug.is_empty() {
                tracing::warn!("Skipping {} {:?}: no usable slug", term.dir(), name);
                continue;
            }

            let posts = pick_cards(cards, index.filter(&term.filter(&name)));
            // Featured row only for longer listings
            let featured: Vec<PostCard> = if posts.len() >= 3 {
                posts
                    .iter()
                    .take(self.blog.config.featured_count)
                    .cloned()
                    .collect()
            } else {
                Vec::new()
            };

            let mut context = base.clone();
            context.insert("heading", &format!("{}: {}", term.label(), name));
            context.insert("featured", &featured);
            context.insert("posts", &posts);

            let html = self.renderer.render("index.html", &context)?;
            let output = Path::new(term.dir()).join(format!("{}.html", slug));
            self.write_page(&output, &html)?;
            tracing::debug!("Generated {}: {:?}", term.dir(), output);
        }

        Ok(())
    }

    /// Generate search index (JSON)
    fn generate_search_index(&self, posts: &[Post]) -> Result<()> {
        let search_data: Vec<serde_json::Value> = posts
            .iter()
            .map(|p| {
                serde_json::json!({
                    "title": p.record.title,
                    "url": self.post_url(&p.record.id),
                    "excerpt": p.excerpt(self.blog.config.excerpt_length),
                    "date": p.record.date,
                    "category": p.record.category,
                    "tags": p.record.tags,
                })
            })
            .collect();

        let output_path = self.blog.public_dir.join("search.json");
        let json = serde_json::to_string_pretty(&search_data)?;
        fs::write(&output_path, json)?;
        tracing::info!("Generated search.json");

        Ok(())
    }

    /// Copy the assets directory into the public directory
    fn copy_assets(&self) -> Result<()> {
        let assets_dir = &self.blog.assets_dir;
        if !assets_dir.exists() {
            tracing::debug!("No assets directory at {:?}", assets_dir);
            return Ok(());
        }

        let target = self.blog.public_dir.join(&self.blog.config.assets_dir);
        for entry in WalkDir::new(assets_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                let relative = path.strip_prefix(assets_dir)?;
                let dest = target.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }

    fn write_page(&self, relative: &Path, html: &str) -> Result<()> {
        let output_path = self.blog.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, html)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
        Ok(())
    }
}

/// Cards for the given records, skipping posts whose file did not load
fn pick_cards(cards: &IndexMap<String, PostCard>, records: Vec<&PostRecord>) -> Vec<PostCard> {
    records
        .into_iter()
        .filter_map(|r| cards.get(&r.id).cloned())
        .collect()
}

fn is_absolute_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//")
}
