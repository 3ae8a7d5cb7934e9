use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Failures reported by an external generation service.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} is not set")]
    MissingCredential(&'static str),
    #[error("Request failed with status code {status}: {body}")]
    Status { status: u16, body: String },
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("{0}")]
    Transport(String),
    #[error("unusable response: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Request URLs can carry credentials, so they never make it into the message.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Raw bytes handed back by an image provider, trusted as-is.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, instruction: &str) -> Result<String, ProviderError>;
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<RawImage, ProviderError>;
}

/// Shortens long payloads (base64, provider bodies) before they hit the log.
pub(crate) fn log_preview(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[{} chars total]", &text[..end], text.len())
}
