use std::sync::Arc;

use axum::{
    extract::{rejection::{FormRejection, JsonRejection}, DefaultBodyLimit, Path, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    error::{stage_code, ApiError},
    form::MeasurementForm,
    models::{
        DesignPayload, DesignResponse, DesignSummary, HealthResponse, ImagePayload, ImageResponse, PromptResponse,
        MISSING_DESIGN_FIELDS, MISSING_PROMPT_FIELD,
    },
    pipeline::DesignPipeline,
    presenter,
};

const BODY_LIMIT: usize = 50 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DesignPipeline>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/assets/*path", get(static_asset))
        .route("/design", post(design_form))
        .route("/api/health", get(health))
        .route("/api/generate-prompt", post(generate_prompt))
        .route("/api/generate-image", post(generate_image))
        .route("/api/design-clothing", post(design_clothing))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "Server is running" })
}

fn design_payload(body: Result<Json<DesignPayload>, JsonRejection>) -> Result<DesignPayload, ApiError> {
    match body {
        Ok(Json(payload)) => Ok(payload),
        Err(rejection) => {
            warn!("⚠️ Rejected request body: {}", rejection.body_text());
            Err(ApiError::MissingFields(MISSING_DESIGN_FIELDS))
        }
    }
}

pub async fn generate_prompt(
    State(state): State<AppState>,
    body: Result<Json<DesignPayload>, JsonRejection>,
) -> Result<Json<PromptResponse>, ApiError> {
    let request = design_payload(body)?
        .into_request()
        .ok_or(ApiError::MissingFields(MISSING_DESIGN_FIELDS))?;
    let prompt = state.pipeline.prompt_only(&request).await?;
    Ok(Json(PromptResponse { success: true, prompt }))
}

pub async fn generate_image(
    State(state): State<AppState>,
    body: Result<Json<ImagePayload>, JsonRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    let prompt = body
        .ok()
        .and_then(|Json(payload)| payload.prompt)
        .filter(|p| !p.trim().is_empty())
        .ok_or(ApiError::MissingFields(MISSING_PROMPT_FIELD))?;
    let image = state.pipeline.image_only(&prompt).await?;
    Ok(Json(ImageResponse { success: true, image_url: image.data_uri() }))
}

pub async fn design_clothing(
    State(state): State<AppState>,
    body: Result<Json<DesignPayload>, JsonRejection>,
) -> Result<Json<DesignResponse>, ApiError> {
    let request = design_payload(body)?
        .into_request()
        .ok_or(ApiError::MissingFields(MISSING_DESIGN_FIELDS))?;
    let design = state.pipeline.full_design(request).await?;
    Ok(Json(DesignResponse {
        success: true,
        prompt: design.prompt,
        image_url: design.image.data_uri(),
        design: DesignSummary {
            clothing_type: design.request.clothing_type,
            style: design.request.style,
            measurements: design.request.measurements,
        },
    }))
}

pub async fn index() -> Html<&'static str> {
    Html(presenter::form_page())
}

pub async fn static_asset(Path(path): Path<String>) -> Response {
    match presenter::asset(&path) {
        Some((content_type, bytes)) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Browser form submission: validate, run the full pipeline, render the result page.
#[axum::debug_handler]
pub async fn design_form(
    State(state): State<AppState>,
    form: Result<Form<MeasurementForm>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!("⚠️ Unreadable form submission: {}", rejection.body_text());
            let page = presenter::error_page("Please fix the form", &[rejection.body_text()]);
            return (StatusCode::BAD_REQUEST, Html(page));
        }
    };

    let request = match form.into_request() {
        Ok(request) => request,
        Err(problems) => {
            warn!("⚠️ Form rejected with {} problem(s): {}", problems.len(), problems.join("; "));
            return (StatusCode::BAD_REQUEST, Html(presenter::error_page("Please fix the form", &problems)));
        }
    };

    info!("📐 Form submitted for {}", request.clothing_type);
    match state.pipeline.full_design(request).await {
        Ok(design) => (StatusCode::OK, Html(presenter::result_page(&design.image, &design.prompt, Utc::now()))),
        Err(e) => {
            error!("❌ Failed to generate design at {} stage: {} ({})", e.stage(), e, stage_code(&e));
            let page = presenter::error_page("Failed to generate design", &[e.to_string()]);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(page))
        }
    }
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
