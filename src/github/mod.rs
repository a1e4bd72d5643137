//! Repository file storage through the GitHub Contents API

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GitHubConfig;
use crate::error::{Error, Result};

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

/// A file read from the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Decoded file content
    pub content: String,
    /// Blob sha, required to overwrite the file
    pub sha: String,
}

/// One file write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCommit {
    /// Commit message
    pub message: String,
    /// New file content, unencoded
    pub content: String,
    /// Sha of the blob being replaced; `None` creates the file
    pub sha: Option<String>,
}

/// Where published files are read from and written to
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch a file; `Ok(None)` when it does not exist
    async fn get_file(&self, path: &str) -> Result<Option<RemoteFile>>;

    /// Create or replace a file
    async fn put_file(&self, path: &str, commit: &FileCommit) -> Result<()>;
}

#[derive(Deserialize)]
struct ContentsResponse {
    #[serde(default)]
    content: Option<String>,
    sha: String,
}

#[derive(Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// [`ContentStore`] backed by a GitHub repository
pub struct GitHubStore {
    http: reqwest::Client,
    config: GitHubConfig,
    token: String,
}

impl GitHubStore {
    /// Create a store for the configured repository.
    /// Fails with a validation error when the token or repository is missing.
    pub fn new(config: GitHubConfig, token: Option<String>) -> Result<Self> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::Validation("a GitHub token is required".to_string()))?;
        if config.owner.is_empty() || config.repo.is_empty() {
            return Err(Error::Validation(
                "github.owner and github.repo must be set in _config.yml".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3));

        let http = reqwest::Client::builder()
            .user_agent(concat!("blogsmith/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            config,
            token,
        })
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ContentStore for GitHubStore {
    async fn get_file(&self, path: &str) -> Result<Option<RemoteFile>> {
        let response = self
            .http
            .get(self.contents_url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("{} does not exist in the repository", path);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(api_error(format!("Failed to fetch {}", path), response).await);
        }

        let body: ContentsResponse = response.json().await?;
        let encoded: String = body
            .content
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| Error::Format(format!("{} is not valid base64: {}", path, e)))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| Error::Format(format!("{} is not valid UTF-8: {}", path, e)))?;

        Ok(Some(RemoteFile {
            content,
            sha: body.sha,
        }))
    }

    async fn put_file(&self, path: &str, commit: &FileCommit) -> Result<()> {
        let body = PutRequest {
            message: &commit.message,
            content: STANDARD.encode(commit.content.as_bytes()),
            branch: &self.config.branch,
            sha: commit.sha.as_deref(),
        };

        tracing::debug!("PUT {} ({})", path, commit.message);
        let response = self
            .http
            .put(self.contents_url(path))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(format!("Failed to write {}", path), response).await);
        }

        Ok(())
    }
}

/// Build an API error from a failed response; the message is the `message`
/// field of a JSON body, or the raw body
async fn api_error(context: String, response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => return Error::Http(e),
    };
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(text);

    Error::Api {
        context,
        status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> GitHubStore {
        let config = GitHubConfig {
            owner: "octo".to_string(),
            repo: "blog".to_string(),
            api_base: server.uri(),
            ..GitHubConfig::default()
        };
        GitHubStore::new(config, Some("tok".to_string())).unwrap()
    }

    #[test]
    fn test_requires_token_and_repo() {
        let config = GitHubConfig {
            owner: "octo".to_string(),
            repo: "blog".to_string(),
            ..GitHubConfig::default()
        };
        let err = GitHubStore::new(config.clone(), None).err().unwrap();
        assert!(matches!(err, Error::Validation(_)));
        let err = GitHubStore::new(config, Some(" ".to_string())).err().unwrap();
        assert!(matches!(err, Error::Validation(_)));

        let err = GitHubStore::new(GitHubConfig::default(), Some("tok".to_string()))
            .err()
            .unwrap();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_file_decodes_content() {
        let server = MockServer::start().await;
        // GitHub wraps base64 at 60 columns
        let encoded = STANDARD.encode(r#"[{"id":"a"}]"#);
        let wrapped = format!("{}\n{}\n", &encoded[..8], &encoded[8..]);

        Mock::given(method("GET"))
            .and(path("/repos/octo/blog/contents/posts/index.json"))
            .and(header("authorization", "Bearer tok"))
            .and(header("accept", ACCEPT_V3))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": wrapped,
                "sha": "abc123",
                "encoding": "base64"
            })))
            .mount(&server)
            .await;

        let file = store_for(&server)
            .get_file("posts/index.json")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(file.content, r#"[{"id":"a"}]"#);
        assert_eq!(file.sha, "abc123");
    }

    #[tokio::test]
    async fn test_get_missing_file_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"message": "Not Found"})),
            )
            .mount(&server)
            .await;

        let file = store_for(&server).get_file("posts/index.json").await.unwrap();
        assert!(file.is_none());
    }

    #[tokio::test]
    async fn test_get_file_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(serde_json::json!({"message": "Resource not accessible"})),
            )
            .mount(&server)
            .await;

        let err = store_for(&server)
            .get_file("posts/index.json")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch posts/index.json. Status: 403. Message: Resource not accessible"
        );
    }

    #[tokio::test]
    async fn test_put_file_sends_payload() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/repos/octo/blog/contents/posts/hello.md"))
            .and(body_partial_json(serde_json::json!({
                "message": "Add new post: Hello",
                "content": STANDARD.encode("# Hello ✓"),
                "branch": "main"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let commit = FileCommit {
            message: "Add new post: Hello".to_string(),
            content: "# Hello ✓".to_string(),
            sha: None,
        };
        store_for(&server)
            .put_file("posts/hello.md", &commit)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body.get("sha").is_none());
    }

    #[tokio::test]
    async fn test_put_file_with_sha_and_plain_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(body_partial_json(serde_json::json!({"sha": "abc123"})))
            .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
            .mount(&server)
            .await;

        let commit = FileCommit {
            message: "Update".to_string(),
            content: "[]".to_string(),
            sha: Some("abc123".to_string()),
        };
        let err = store_for(&server)
            .put_file("posts/index.json", &commit)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(
            err.to_string(),
            "Failed to write posts/index.json. Status: 409. Message: conflict"
        );
    }
}
