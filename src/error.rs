use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::ErrorBody;
use crate::pipeline::StageFailure;
use crate::prompt::PromptError;
use crate::synthesizer::ImageError;

/// Everything an API handler can fail with; serialized as `{ error, message, code }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    MissingFields(&'static str),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Design(#[from] StageFailure),
    #[error("No route for {0}")]
    NotFound(String),
}

pub fn prompt_code(err: &PromptError) -> &'static str {
    match err {
        PromptError::Configuration(_) => "configuration_error",
        PromptError::Upstream(_) => "text_generation_failed",
    }
}

pub fn image_code(err: &ImageError) -> &'static str {
    match err {
        ImageError::Configuration(_) => "configuration_error",
        ImageError::RateLimited => "rate_limited",
        ImageError::InvalidPrompt => "invalid_prompt",
        ImageError::Timeout => "image_timeout",
        ImageError::Upstream(_) => "image_generation_failed",
    }
}

pub fn stage_code(err: &StageFailure) -> &'static str {
    match err {
        StageFailure::Prompt(e) => prompt_code(e),
        StageFailure::Image(e) => image_code(e),
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String, &'static str) {
        match self {
            ApiError::MissingFields(msg) => (StatusCode::BAD_REQUEST, *msg, msg.to_string(), "missing_fields"),
            ApiError::Prompt(e) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate prompt", e.to_string(), prompt_code(e)),
            ApiError::Image(e) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate image", e.to_string(), image_code(e)),
            ApiError::Design(e) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate design", e.to_string(), stage_code(e)),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found", self.to_string(), "not_found"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, label, message, code) = self.parts();
        if status.is_server_error() {
            error!("❌ {}: {} ({})", label, message, code);
        } else {
            warn!("⚠️ {}: {}", label, message);
        }
        let body = ErrorBody { error: label.to_string(), message, code: code.to_string() };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MISSING_DESIGN_FIELDS;

    #[test]
    fn client_errors_are_400() {
        let (status, label, message, code) = ApiError::MissingFields(MISSING_DESIGN_FIELDS).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(label, MISSING_DESIGN_FIELDS);
        assert_eq!(message, MISSING_DESIGN_FIELDS);
        assert_eq!(code, "missing_fields");
    }

    #[test]
    fn image_sub_kinds_share_status_but_not_code() {
        let (rate_status, _, _, rate_code) = ApiError::Image(ImageError::RateLimited).parts();
        let (timeout_status, _, msg, timeout_code) = ApiError::Image(ImageError::Timeout).parts();
        assert_eq!(rate_status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(timeout_status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_ne!(rate_code, timeout_code);
        assert!(msg.contains("took too long"));
    }

    #[test]
    fn stage_errors_convert_with_question_mark() {
        fn fail() -> Result<(), ApiError> {
            Err(ImageError::InvalidPrompt)?
        }
        let err = fail().unwrap_err();
        assert!(matches!(err, ApiError::Image(ImageError::InvalidPrompt)));
        assert_eq!(err.to_string(), "Invalid prompt. Please revise and try again.");
        assert_eq!(ApiError::NotFound("/x".into()).to_string(), "No route for /x");
    }

    #[test]
    fn design_errors_keep_stage_message() {
        let err = ApiError::Design(StageFailure::Prompt(PromptError::Upstream("quota exceeded".into())));
        let (_, label, message, code) = err.parts();
        assert_eq!(label, "Failed to generate design");
        assert_eq!(message, "Failed to generate prompt: quota exceeded");
        assert_eq!(code, "text_generation_failed");
    }
}
