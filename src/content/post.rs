//! Post records and the posts index

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;

use super::FrontMatter;
use crate::error::{Error, Result};
use crate::helpers::{excerpt_from_html, long_date, parse_date};

/// Treat a missing, null or blank string as absent
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Treat a null tag list as empty
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of the posts index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Slug, unique within the index
    pub id: String,

    pub title: String,

    /// ISO-8601 date string
    pub date: String,

    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub author: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,

    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,

    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub excerpt: Option<String>,

    /// Featured image URL
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,

    /// Markdown file name inside the posts directory
    pub file: String,
}

impl PostRecord {
    /// Create a record with the required fields; the file is `{id}.md`
    pub fn new(id: impl Into<String>, title: impl Into<String>, date: impl Into<String>) -> Self {
        let id = id.into();
        let file = format!("{}.md", id);
        Self {
            id,
            title: title.into(),
            date: date.into(),
            author: None,
            tags: Vec::new(),
            category: None,
            excerpt: None,
            image: None,
            file,
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        parse_date(&self.date)
    }

    /// Date formatted like "January 5, 2024"
    pub fn display_date(&self) -> String {
        long_date(&self.date)
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    fn matches(&self, filter: &PostFilter) -> bool {
        if let Some(query) = filter.search.as_deref() {
            let query = query.to_lowercase();
            let hit = self.title.to_lowercase().contains(&query)
                || self
                    .excerpt
                    .as_deref()
                    .is_some_and(|e| e.to_lowercase().contains(&query))
                || self.tags.iter().any(|t| t.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }

        if let Some(category) = filter.category.as_deref() {
            let same = self
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase() == category.to_lowercase());
            if !same {
                return false;
            }
        }

        if let Some(tag) = filter.tag.as_deref() {
            if !self.has_tag(tag) {
                return false;
            }
        }

        true
    }
}

/// Newest first; undated records sink to the end
fn by_date_desc(a: &PostRecord, b: &PostRecord) -> Ordering {
    match (a.parsed_date(), b.parsed_date()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Search, category and tag criteria; every criterion given must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Case-insensitive substring of the title, excerpt or a tag
    pub search: Option<String>,
    /// Case-insensitive category name
    pub category: Option<String>,
    /// Case-insensitive tag name
    pub tag: Option<String>,
}

impl PostFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.category.is_none() && self.tag.is_none()
    }
}

/// The posts index: an ordered list of records, newest inserted first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostsIndex {
    posts: Vec<PostRecord>,
}

impl PostsIndex {
    pub fn new(posts: Vec<PostRecord>) -> Self {
        Self { posts }
    }

    /// Parse the JSON array stored in the index file
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Format(format!("posts index is not a valid JSON array: {}", e)))
    }

    /// Serialize as a pretty-printed JSON array (2-space indent)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.posts)?)
    }

    pub fn posts(&self) -> &[PostRecord] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Insert a record at the front of the index
    pub fn prepend(&mut self, record: PostRecord) {
        self.posts.insert(0, record);
    }

    pub fn find(&self, id: &str) -> Option<&PostRecord> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// All records, newest first (stable for equal dates)
    pub fn sorted_by_date(&self) -> Vec<&PostRecord> {
        let mut posts: Vec<_> = self.posts.iter().collect();
        posts.sort_by(|a, b| by_date_desc(a, b));
        posts
    }

    /// The `count` most recent records
    pub fn featured(&self, count: usize) -> Vec<&PostRecord> {
        let mut posts = self.sorted_by_date();
        posts.truncate(count);
        posts
    }

    /// Records matching the filter, newest first
    pub fn filter(&self, filter: &PostFilter) -> Vec<&PostRecord> {
        self.sorted_by_date()
            .into_iter()
            .filter(|p| p.matches(filter))
            .collect()
    }

    /// Up to `count` posts related to `current`: same category or a shared
    /// tag first, then the most recent remaining posts
    pub fn related(&self, current: &PostRecord, count: usize) -> Vec<&PostRecord> {
        let mut related: Vec<&PostRecord> = self
            .posts
            .iter()
            .filter(|p| p.id != current.id)
            .filter(|p| {
                let same_category = matches!(
                    (&p.category, &current.category),
                    (Some(a), Some(b)) if a == b
                );
                same_category || p.tags.iter().any(|t| current.tags.contains(t))
            })
            .collect();

        if related.len() < count {
            let recent: Vec<&PostRecord> = self
                .sorted_by_date()
                .into_iter()
                .filter(|p| p.id != current.id && !related.iter().any(|r| r.id == p.id))
                .collect();
            related.extend(recent);
        }

        related.truncate(count);
        related
    }

    /// Distinct categories with post counts, in first-appearance order
    pub fn categories(&self) -> Vec<(String, usize)> {
        count_in_order(self.posts.iter().filter_map(|p| p.category.as_deref()))
    }

    /// Distinct tags with post counts, in first-appearance order
    pub fn tags(&self) -> Vec<(String, usize)> {
        count_in_order(self.posts.iter().flat_map(|p| p.tags.iter().map(String::as_str)))
    }
}

/// A record together with its rendered markdown file
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    #[serde(flatten)]
    pub record: PostRecord,
    /// Front matter of the post file
    pub metadata: FrontMatter,
    /// Rendered body
    pub content: String,
}

impl Post {
    /// The record's excerpt, or the first `length` characters of the
    /// rendered body with tags stripped
    pub fn excerpt(&self, length: usize) -> String {
        match &self.record.excerpt {
            Some(excerpt) => excerpt.clone(),
            None => excerpt_from_html(&self.content, length),
        }
    }
}

fn count_in_order<'a>(names: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts = indexmap::IndexMap::<&str, usize>::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect()
}
