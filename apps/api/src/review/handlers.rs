//! Axum route handlers for the Review API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::{layout, Document, LayoutConfig, LayoutOptions};
use crate::render::render_pdf;
use crate::review::rubric::{list_rubrics, RubricSummary, RubricVariant};
use crate::review::upload::{PaperUpload, UploadError};
use crate::state::AppState;

const PDF_FILE_NAME: &str = "peer-review.pdf";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RubricListResponse {
    pub rubrics: Vec<RubricSummary>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub review_id: Uuid,
    pub rubric: RubricVariant,
    pub rubric_label: &'static str,
    pub review_text: String,
    pub page_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    pub text: String,
    pub title: Option<String>,
    #[serde(default)]
    pub options: LayoutOptions,
}

/// Multipart fields collected from a review submission.
#[derive(Default)]
struct ReviewForm {
    rubric: Option<String>,
    paper: Option<PaperUpload>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/rubrics
pub async fn handle_list_rubrics() -> Json<RubricListResponse> {
    Json(RubricListResponse {
        rubrics: list_rubrics(),
    })
}

/// POST /api/v1/reviews
///
/// Multipart form with a `file` part (PDF or DOCX) and a `rubric` field.
/// Uploads the paper, asks the reviewer for a review and lays it out to
/// report the page count of the eventual PDF.
pub async fn handle_create_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<ReviewResponse>, AppError> {
    let api_key = state.api_key(&headers)?;

    let form = read_review_form(multipart).await?;
    let rubric = RubricVariant::parse_field(form.rubric.as_deref().unwrap_or_default())?;
    let paper = form.paper.ok_or(UploadError::Missing)?;

    info!(
        rubric = rubric.index(),
        file_name = %paper.file_name,
        bytes = paper.size(),
        "Generating peer review"
    );

    let review_text = state
        .reviewer
        .review_paper(&api_key, &paper, &rubric.instructions())
        .await?;

    let config = state.report_layout(None);
    let document = run_layout(review_text.clone(), config, &state).await?;

    let review_id = Uuid::new_v4();
    info!(%review_id, pages = document.page_count(), "Peer review generated");

    Ok(Json(ReviewResponse {
        review_id,
        rubric,
        rubric_label: rubric.label(),
        review_text,
        page_count: document.page_count(),
    }))
}

/// POST /api/v1/layout
///
/// Returns the paginated document for a piece of review text.
pub async fn handle_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<Document>, AppError> {
    let config = request
        .options
        .apply(state.report_layout(request.title.as_deref()));
    let document = run_layout(request.text, config, &state).await?;
    Ok(Json(document))
}

/// POST /api/v1/render
///
/// Lays out review text and returns it as a downloadable PDF report.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Response, AppError> {
    let config = request
        .options
        .apply(state.report_layout(request.title.as_deref()));
    let measure = state.measure;
    let text = request.text;

    let pdf = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, AppError> {
        let document = layout(&text, &config, &measure)?;
        Ok(render_pdf(&document)?)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed rendering PDF: {e}")))??;

    info!(bytes = pdf.len(), "Rendered review PDF");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{PDF_FILE_NAME}\""),
            ),
        ],
        pdf,
    )
        .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Layout is CPU-bound, so it runs off the async workers.
async fn run_layout(
    text: String,
    config: LayoutConfig,
    state: &AppState,
) -> Result<Document, AppError> {
    let measure = state.measure;
    let document = tokio::task::spawn_blocking(move || layout(&text, &config, &measure))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout: {e}")))??;
    Ok(document)
}

async fn read_review_form(mut multipart: Multipart) -> Result<ReviewForm, AppError> {
    let mut form = ReviewForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("rubric") => {
                form.rubric = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                form.paper = Some(PaperUpload::new(
                    file_name.as_deref(),
                    content_type.as_deref(),
                    data,
                )?);
            }
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return UploadError::TooLarge.into();
    }
    AppError::Validation(format!("Invalid multipart body: {}", err.body_text()))
}
