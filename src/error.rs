//! Error types for talking to external systems

use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the loader, the draft client and the publisher
#[derive(Error, Debug)]
pub enum Error {
    /// Local file system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level HTTP failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success status
    #[error("{context}. Status: {status}. Message: {message}")]
    Api {
        context: String,
        status: u16,
        message: String,
    },

    /// A body or document was not in the expected shape
    #[error("Format error: {0}")]
    Format(String),

    /// Required user input was missing; raised before any request is made
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Status code of an API failure, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Replace the context of an API failure; other errors pass through
    pub fn with_context(self, context: impl Into<String>) -> Self {
        match self {
            Error::Api {
                status, message, ..
            } => Error::Api {
                context: context.into(),
                status,
                message,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let err = Error::Api {
            context: "Failed to create markdown file in repository".to_string(),
            status: 422,
            message: "sha wasn't supplied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to create markdown file in repository. Status: 422. Message: sha wasn't supplied"
        );
        assert_eq!(err.status(), Some(422));
        assert_eq!(Error::Validation("x".into()).status(), None);
    }

    #[test]
    fn test_with_context() {
        let err = Error::Api {
            context: "PUT posts/a.md".to_string(),
            status: 409,
            message: "conflict".to_string(),
        }
        .with_context("Failed to update index.json in repository");
        assert_eq!(
            err.to_string(),
            "Failed to update index.json in repository. Status: 409. Message: conflict"
        );

        let err = Error::Format("bad".into()).with_context("ignored");
        assert_eq!(err.to_string(), "Format error: bad");
    }
}
