//! Draft generation through a chat-completion API

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::helpers::{slugify, today};

/// Longest slice of a non-JSON error body quoted in an error message
const ERROR_SNIPPET_CHARS: usize = 200;

lazy_static! {
    static ref TITLE_LINE: Regex = Regex::new(r"title:[ \t]*(\S.*)").unwrap();
}

/// Requested draft length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Length {
    Short,
    #[default]
    Medium,
    Long,
}

impl Length {
    /// Parse a length name; anything unknown is medium
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "short" => Length::Short,
            "long" => Length::Long,
            _ => Length::Medium,
        }
    }

    pub fn word_count(self) -> usize {
        match self {
            Length::Short => 500,
            Length::Medium => 1000,
            Length::Long => 1500,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Length::Short => "short",
            Length::Medium => "medium",
            Length::Long => "long",
        };
        f.write_str(name)
    }
}

/// What to write about
#[derive(Debug, Clone)]
pub struct DraftRequest {
    pub topic: String,
    pub tone: String,
    pub length: Length,
}

impl DraftRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            tone: "professional".to_string(),
            length: Length::Medium,
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
}

/// Client for the chat-completion endpoint
pub struct DraftClient {
    http: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl DraftClient {
    pub fn new(config: LlmConfig, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            api_key,
        }
    }

    /// Instructions sent as the system message
    pub fn system_message(&self, request: &DraftRequest) -> String {
        format!(
            "You are a professional blog writer creating high-quality, SEO-optimized blog posts in Markdown format.
Create a comprehensive {length} blog post (about {words} words) on the topic provided.

Guidelines:
- Write in a {tone} tone
- Use proper Markdown formatting including:
  - Clear headings (# for main title, ## for sections, ### for subsections)
  - **Bold** for important points
  - *Italic* for emphasis
  - Bullet lists and numbered lists where appropriate
  - Add 3-5 relevant emojis where appropriate
- Include a metadata section at the top with title, date, author, and tags
- Structure should include:
  - Introduction
  - 3-5 main sections with subheadings
  - Conclusion or call to action
- Write as if for a mobile audience with clear, scannable sections
- Add a unique perspective and valuable insights
- Make it engaging, factual, and authoritative

Output Format:
---
title: [Generated Title]
date: {date}
author: {author}
tags: [3-5 relevant tags]
category: [Relevant Category]
excerpt: [Brief 1-2 sentence summary]
---

[Full Markdown Content]
",
            length = request.length,
            words = request.length.word_count(),
            tone = request.tone,
            date = today(),
            author = self.config.author,
        )
    }

    /// Ask the model for a markdown draft
    pub async fn generate(&self, request: &DraftRequest) -> Result<String> {
        if request.topic.trim().is_empty() {
            return Err(Error::Validation("a topic is required".to_string()));
        }
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Validation("an API key is required".to_string()))?;

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.system_message(request),
                },
                ChatMessage {
                    role: "user",
                    content: format!("Please write a blog post about: {}", request.topic),
                },
            ],
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        };

        tracing::info!(
            "Requesting a {} draft about {:?} from {}",
            request.length,
            request.topic,
            self.config.model
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let data: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = data
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| snippet(&text));
            return Err(Error::Api {
                context: "Failed to generate blog post".to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let content = data
            .as_ref()
            .and_then(|d| d.pointer("/choices/0/message/content"))
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty());

        Ok(match content {
            Some(content) => content.to_string(),
            None => {
                tracing::warn!("Unexpected completion shape; returning the raw body");
                text
            }
        })
    }
}

fn error_message(data: &Value) -> Option<String> {
    data.pointer("/error/message")
        .or_else(|| data.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn snippet(text: &str) -> String {
    let head: String = text.chars().take(ERROR_SNIPPET_CHARS).collect();
    if text.chars().count() > ERROR_SNIPPET_CHARS {
        format!("{}...", head)
    } else {
        head
    }
}

/// File name for a draft: the slug of its `title:` line, or `blog-post.md`
pub fn draft_file_name(markdown: &str) -> String {
    let slug = TITLE_LINE
        .captures(markdown)
        .map(|caps| slugify(&caps[1]))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "blog-post".to_string());
    format!("{}.md", slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> DraftClient {
        let config = LlmConfig {
            endpoint: format!("{}/inference/chat/completions", server.uri()),
            ..LlmConfig::default()
        };
        DraftClient::new(config, api_key.map(str::to_string))
    }

    #[test]
    fn test_length_words() {
        assert_eq!(Length::parse("short").word_count(), 500);
        assert_eq!(Length::parse("Medium").word_count(), 1000);
        assert_eq!(Length::parse("long").word_count(), 1500);
        assert_eq!(Length::parse("epic"), Length::Medium);
    }

    #[test]
    fn test_system_message() {
        let client = DraftClient::new(LlmConfig::default(), None);
        let mut request = DraftRequest::new("Rust");
        request.tone = "casual".to_string();
        request.length = Length::Long;

        let message = client.system_message(&request);
        assert!(message.contains("Create a comprehensive long blog post (about 1500 words)"));
        assert!(message.contains("- Write in a casual tone"));
        assert!(message.contains(&format!("date: {}\n", today())));
        assert!(message.contains("author: AI Content Writer\n"));
    }

    #[test]
    fn test_draft_file_name() {
        assert_eq!(
            draft_file_name("---\ntitle: Hello, Cloud World!\n---\n"),
            "hello-cloud-world.md"
        );
        assert_eq!(draft_file_name("# no metadata"), "blog-post.md");
        assert_eq!(draft_file_name("title: !!!"), "blog-post.md");
    }

    #[test]
    fn test_snippet() {
        assert_eq!(snippet("short"), "short");
        let long = "x".repeat(250);
        assert_eq!(snippet(&long), format!("{}...", "x".repeat(200)));
    }

    #[tokio::test]
    async fn test_generate_returns_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/inference/chat/completions"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(serde_json::json!({
                "model": "openai/gpt-4.1",
                "temperature": 1.0,
                "top_p": 1.0
            })))
            .and(body_string_contains("Please write a blog post about: Rust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "---\ntitle: Rust\n---\n# Rust"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        let draft = client.generate(&DraftRequest::new("Rust")).await.unwrap();
        assert_eq!(draft, "---\ntitle: Rust\n---\n# Rust");
    }

    #[tokio::test]
    async fn test_generate_falls_back_to_raw_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# plain markdown"))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        let draft = client.generate(&DraftRequest::new("Rust")).await.unwrap();
        assert_eq!(draft, "# plain markdown");
    }

    #[tokio::test]
    async fn test_generate_error_message_from_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Bad credentials"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        let err = client.generate(&DraftRequest::new("Rust")).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(
            err.to_string(),
            "Failed to generate blog post. Status: 401. Message: Bad credentials"
        );
    }

    #[tokio::test]
    async fn test_generate_error_snippet_from_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("y".repeat(300)))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        let err = client.generate(&DraftRequest::new("Rust")).await.unwrap_err();
        match err {
            Error::Api { status, message, .. } => {
                assert_eq!(status, 502);
                assert_eq!(message, format!("{}...", "y".repeat(200)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_validation_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.generate(&DraftRequest::new("Rust")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let client = client_for(&server, Some("secret"));
        let err = client.generate(&DraftRequest::new("  ")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
