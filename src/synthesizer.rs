use std::sync::Arc;

use base64::Engine;
use thiserror::Error;
use tracing::{error, info};

use crate::models::GeneratedImage;
use crate::provider::{log_preview, ImageGenerator, ProviderError, RawImage};

pub const FALLBACK_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("{0}")]
    Configuration(String),
    #[error("Rate limited by Hugging Face. Please try again in a moment.")]
    RateLimited,
    #[error("Invalid prompt. Please revise and try again.")]
    InvalidPrompt,
    #[error("Image generation took too long. Please try again.")]
    Timeout,
    #[error("Failed to generate image: {0}")]
    Upstream(String),
}

impl From<ProviderError> for ImageError {
    fn from(err: ProviderError) -> Self {
        match err.status() {
            Some(429) => return Self::RateLimited,
            Some(400) => return Self::InvalidPrompt,
            _ => {}
        }
        match err {
            ProviderError::MissingCredential(_) => Self::Configuration(err.to_string()),
            ProviderError::Timeout(_) => Self::Timeout,
            other => {
                let message = other.to_string();
                if message.to_ascii_lowercase().contains("timeout") {
                    Self::Timeout
                } else {
                    Self::Upstream(message)
                }
            }
        }
    }
}

/// Sends a finished prompt to the image model and packs the reply into a data URI.
pub struct ImageSynthesizer {
    images: Arc<dyn ImageGenerator>,
}

impl ImageSynthesizer {
    pub fn new(images: Arc<dyn ImageGenerator>) -> Self {
        Self { images }
    }

    pub async fn synthesize(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        info!("🎨 Generating image for prompt: {}", log_preview(prompt, 100));
        match self.images.generate_image(prompt).await {
            Ok(raw) => {
                let image = encode(raw);
                info!("✅ Image generated: {}", log_preview(&image.base64_data, 50));
                Ok(image)
            }
            Err(e) => {
                error!("❌ Error generating image: {}", e);
                Err(e.into())
            }
        }
    }
}

fn encode(raw: RawImage) -> GeneratedImage {
    let mime_type = raw
        .content_type
        .map(|ct| ct.trim().to_string())
        .filter(|ct| !ct.is_empty())
        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());
    GeneratedImage {
        mime_type,
        base64_data: base64::engine::general_purpose::STANDARD.encode(&raw.bytes),
    }
}
