use std::fmt;

use thiserror::Error;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::models::{DesignRequest, GeneratedImage};
use crate::prompt::{PromptComposer, PromptError};
use crate::synthesizer::{ImageError, ImageSynthesizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prompt,
    Image,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Prompt => write!(f, "prompt"),
            Stage::Image => write!(f, "image"),
        }
    }
}

/// Which stage of the design pipeline gave up, and why.
#[derive(Debug, Error)]
pub enum StageFailure {
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl StageFailure {
    pub fn stage(&self) -> Stage {
        match self {
            StageFailure::Prompt(_) => Stage::Prompt,
            StageFailure::Image(_) => Stage::Image,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Design {
    pub prompt: String,
    pub image: GeneratedImage,
    pub request: DesignRequest,
}

/// Prompt stage followed by image stage. Holds no per-request state.
pub struct DesignPipeline {
    composer: PromptComposer,
    synthesizer: ImageSynthesizer,
}

impl DesignPipeline {
    pub fn new(composer: PromptComposer, synthesizer: ImageSynthesizer) -> Self {
        Self { composer, synthesizer }
    }

    pub async fn prompt_only(&self, request: &DesignRequest) -> Result<String, PromptError> {
        self.composer.compose(request).await
    }

    pub async fn image_only(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        self.synthesizer.synthesize(prompt).await
    }

    /// Runs both stages in order; the image stage never starts if the prompt stage fails.
    pub async fn full_design(&self, request: DesignRequest) -> Result<Design, StageFailure> {
        let span = tracing::info_span!("design", request_id = %Uuid::new_v4());
        async move {
            info!("🚀 Generating design for: {}", request.clothing_type);
            let prompt = self.composer.compose(&request).await?;
            let image = self.synthesizer.synthesize(&prompt).await?;
            info!("✅ Design complete for: {}", request.clothing_type);
            Ok(Design { prompt, image, request })
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;
    use crate::provider::{ImageGenerator, ProviderError, RawImage, TextGenerator};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingText {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl TextGenerator for CountingText {
        async fn generate_text(&self, _: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ProviderError::Malformed("empty candidates".into()))
            } else {
                Ok("prompt text".into())
            }
        }
    }

    #[derive(Default)]
    struct CountingImages {
        calls: AtomicUsize,
        status: Option<u16>,
    }

    #[async_trait]
    impl ImageGenerator for CountingImages {
        async fn generate_image(&self, _: &str) -> Result<RawImage, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.status {
                Some(status) => Err(ProviderError::Status { status, body: String::new() }),
                None => Ok(RawImage { bytes: Bytes::from_static(b"img"), content_type: None }),
            }
        }
    }

    fn pipeline(text: &Arc<CountingText>, images: &Arc<CountingImages>) -> DesignPipeline {
        DesignPipeline::new(PromptComposer::new(text.clone()), ImageSynthesizer::new(images.clone()))
    }

    fn request() -> DesignRequest {
        DesignRequest {
            measurements: FieldValue::Text("chest: 38 inches".into()),
            clothing_type: "Jacket".into(),
            style: Some("Vintage".into()),
            preferences: None,
        }
    }

    #[tokio::test]
    async fn both_stages_run_in_order() {
        let text = Arc::new(CountingText::default());
        let images = Arc::new(CountingImages::default());
        let design = pipeline(&text, &images).full_design(request()).await.unwrap();
        assert_eq!(design.prompt, "prompt text");
        assert_eq!(design.image.mime_type, "image/jpeg");
        assert_eq!(design.request.clothing_type, "Jacket");
        assert_eq!(images.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn prompt_failure_skips_image_stage() {
        let text = Arc::new(CountingText { fail: true, ..Default::default() });
        let images = Arc::new(CountingImages::default());
        let err = pipeline(&text, &images).full_design(request()).await.unwrap_err();
        assert_eq!(err.stage(), Stage::Prompt);
        assert_eq!(images.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn image_failure_names_image_stage() {
        let text = Arc::new(CountingText::default());
        let images = Arc::new(CountingImages { status: Some(429), ..Default::default() });
        let err = pipeline(&text, &images).full_design(request()).await.unwrap_err();
        assert_eq!(err.stage(), Stage::Image);
        assert!(matches!(err, StageFailure::Image(ImageError::RateLimited)));
        assert_eq!(text.calls.load(Ordering::SeqCst), 1);
    }
}
