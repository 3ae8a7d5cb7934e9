use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::json;
use tracing::{error, info};

use crate::provider::{log_preview, ImageGenerator, ProviderError, RawImage};

/// Image capability backed by a Hugging Face hosted diffusion model.
pub struct HuggingFaceClient {
    client: Client,
    api_key: Option<String>,
    model_url: String,
}

impl HuggingFaceClient {
    pub fn new(api_key: Option<String>, model_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                error!("❌ Failed to build Hugging Face HTTP client with timeout, using defaults: {}", e);
                Client::new()
            });
        Self { client, api_key, model_url: model_url.into() }
    }
}

#[async_trait]
impl ImageGenerator for HuggingFaceClient {
    async fn generate_image(&self, prompt: &str) -> Result<RawImage, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential("HUGGINGFACE_API_KEY"))?;

        info!("🔗 Requesting image from: {}", self.model_url);

        let response = self
            .client
            .post(&self.model_url)
            .bearer_auth(api_key)
            .json(&json!({ "inputs": prompt }))
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Image API error response: {}", log_preview(&body, 500));
            return Err(ProviderError::Status { status: status.as_u16(), body });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(ProviderError::from_reqwest)?;
        info!("🖼️ Received {} bytes ({})", bytes.len(), content_type.as_deref().unwrap_or("no content type"));

        Ok(RawImage { bytes, content_type })
    }
}
