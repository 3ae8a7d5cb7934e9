#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use serde_json::Value;
use tower::ServiceExt;

use cozycraft::pipeline::DesignPipeline;
use cozycraft::prompt::PromptComposer;
use cozycraft::provider::{ImageGenerator, ProviderError, RawImage, TextGenerator};
use cozycraft::routes::{router, AppState};
use cozycraft::synthesizer::ImageSynthesizer;

/// Text double: fixed reply, or a reply derived from the clothing type in the instruction.
pub struct FakeText {
    pub calls: AtomicUsize,
    reply: Option<String>,
    failure: Option<fn() -> ProviderError>,
}

impl FakeText {
    pub fn fixed(reply: &str) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), reply: Some(reply.to_string()), failure: None })
    }

    /// Replies with `prompt for <clothing type>` so concurrent requests can be told apart.
    pub fn echoing() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), reply: None, failure: None })
    }

    pub fn failing(failure: fn() -> ProviderError) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), reply: None, failure: Some(failure) })
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeText {
    async fn generate_text(&self, instruction: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.failure {
            return Err(failure());
        }
        if let Some(reply) = &self.reply {
            return Ok(reply.clone());
        }
        let clothing_type = instruction
            .lines()
            .find_map(|line| line.strip_prefix("CLOTHING TYPE: "))
            .unwrap_or("unknown");
        tokio::task::yield_now().await;
        Ok(format!("prompt for {clothing_type}"))
    }
}

/// Image double: returns the prompt bytes back, or a scripted failure.
pub struct FakeImages {
    pub calls: AtomicUsize,
    content_type: Option<String>,
    failure: Option<fn() -> ProviderError>,
}

impl FakeImages {
    pub fn jpeg() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), content_type: None, failure: None })
    }

    pub fn with_content_type(mime: &str) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), content_type: Some(mime.to_string()), failure: None })
    }

    pub fn failing(failure: fn() -> ProviderError) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), content_type: None, failure: Some(failure) })
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for FakeImages {
    async fn generate_image(&self, prompt: &str) -> Result<RawImage, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.failure {
            return Err(failure());
        }
        tokio::task::yield_now().await;
        Ok(RawImage { bytes: Bytes::copy_from_slice(prompt.as_bytes()), content_type: self.content_type.clone() })
    }
}

pub fn app(text: Arc<FakeText>, images: Arc<FakeImages>) -> Router {
    app_with(text, images)
}

pub fn app_with(text: Arc<dyn TextGenerator>, images: Arc<dyn ImageGenerator>) -> Router {
    let pipeline = DesignPipeline::new(PromptComposer::new(text), ImageSynthesizer::new(images));
    router(AppState { pipeline: Arc::new(pipeline) })
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub fn tee_request() -> Value {
    serde_json::json!({
        "measurements": {
            "chest": "38 inches",
            "waist": "32 inches",
            "length": "28 inches",
            "sleeves": "32 inches",
            "fit": "Regular",
            "color": "Black",
            "material": "Cotton"
        },
        "clothingType": "T-Shirt",
        "style": "Casual",
        "preferences": ""
    })
}
