use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::models::DesignRequest;
use crate::provider::{log_preview, ProviderError, TextGenerator};

const DEFAULT_STYLE: &str = "Modern";
const NO_PREFERENCES: &str = "No specific preferences";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("{0}")]
    Configuration(String),
    #[error("Failed to generate prompt: {0}")]
    Upstream(String),
}

impl From<ProviderError> for PromptError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::MissingCredential(_) => Self::Configuration(err.to_string()),
            other => Self::Upstream(other.to_string()),
        }
    }
}

/// Turns a design request into an instruction and lets the text model expand it.
pub struct PromptComposer {
    text: Arc<dyn TextGenerator>,
}

impl PromptComposer {
    pub fn new(text: Arc<dyn TextGenerator>) -> Self {
        Self { text }
    }

    /// Deterministic instruction sent to the text model.
    pub fn build_instruction(request: &DesignRequest) -> String {
        let measurements = request.measurements.render();
        let preferences = request
            .preferences
            .as_ref()
            .map(|p| p.render())
            .unwrap_or_else(|| NO_PREFERENCES.to_string());
        let style = request.style.as_deref().unwrap_or(DEFAULT_STYLE);
        let clothing_type = &request.clothing_type;

        format!(
            "You are an expert fashion designer. Create a detailed, vivid image generation prompt for custom clothing based on these specifications:

MEASUREMENTS:
{measurements}

CLOTHING TYPE: {clothing_type}
STYLE: {style}
PREFERENCES: {preferences}

Generate a detailed prompt that will be used to create a realistic, high-quality image of the custom {clothing_type}. The prompt should:
1. Describe the fit based on the measurements (how snug, loose, tailored, etc.)
2. Include color, material, and texture details
3. Specify style elements and design details (pockets, buttons, seams, etc.)
4. Describe how it should appear on a model
5. Include lighting and photography style for best presentation

Make the prompt creative, specific, and suitable for an AI image generator. Focus on realistic fashion design presentation."
        )
    }

    pub async fn compose(&self, request: &DesignRequest) -> Result<String, PromptError> {
        let instruction = Self::build_instruction(request);
        info!("🎯 Composing prompt for {} ({})", request.clothing_type, request.style.as_deref().unwrap_or(DEFAULT_STYLE));

        match self.text.generate_text(&instruction).await {
            Ok(prompt) => {
                info!("✅ Prompt generated ({} chars): {}", prompt.len(), log_preview(&prompt, 120));
                Ok(prompt)
            }
            Err(e) => {
                error!("❌ Prompt generation failed: {}", e);
                Err(e.into())
            }
        }
    }
}
