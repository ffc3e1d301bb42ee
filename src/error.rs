use std::io;
use thiserror::Error;

/// Why a single source file contributed no elements.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read source: {0}")]
    Io(#[from] io::Error),
    #[error("syntax error near line {line}")]
    Syntax { line: usize },
    #[error("no parser for {0}")]
    Unsupported(String),
}

/// Failure of the text-generation collaborator, at initialization or call time.
#[derive(Debug, Error)]
pub enum AugmentError {
    #[error("text generation is disabled")]
    Disabled,
    #[error("no API key configured (set OPENAI_API_KEY)")]
    MissingApiKey,
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    #[error("request timed out")]
    Timeout,
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("service returned HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("generator panicked")]
    Panicked,
}

impl From<reqwest::Error> for AugmentError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AugmentError::Timeout
        } else if let Some(status) = e.status() {
            AugmentError::Status(status.as_u16())
        } else if e.is_decode() {
            AugmentError::MalformedResponse(e.to_string())
        } else {
            AugmentError::Http(e.to_string())
        }
    }
}
