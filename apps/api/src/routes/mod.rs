pub mod generate;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::review::handlers;
use crate::review::upload::MAX_FILE_SIZE;
use crate::state::AppState;

/// Room for multipart framing around a maximum-size paper.
const REQUEST_BODY_LIMIT: usize = MAX_FILE_SIZE + 2 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Review API
        .route("/api/v1/rubrics", get(handlers::handle_list_rubrics))
        .route("/api/v1/reviews", post(handlers::handle_create_review))
        .route("/api/v1/layout", post(handlers::handle_layout))
        .route("/api/v1/render", post(handlers::handle_render))
        // Prompt proxy
        .route("/api/generate", post(generate::handle_generate))
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::{Config, DEFAULT_OPENAI_BASE_URL, DEFAULT_REPORT_TITLE};
    use crate::layout::{FontFamily, FontMeasure};
    use crate::llm_client::LlmError;
    use crate::review::reviewer::Reviewer;
    use crate::review::upload::{PaperUpload, PDF_MIME};
    use crate::state::API_KEY_HEADER;

    const BOUNDARY: &str = "peer-review-test-boundary";
    const REVIEW_TEXT: &str = "**What is the main goal of the project?**\n\
        The paper studies in-context learning.\n\n\
        **What are the main claims?**\n\
        Transformers implement gradient descent in their forward pass.";

    /// Canned reviewer: `sk-bad` is rejected like the provider does.
    struct StubReviewer;

    #[async_trait]
    impl Reviewer for StubReviewer {
        async fn review_paper(
            &self,
            api_key: &str,
            paper: &PaperUpload,
            instructions: &str,
        ) -> Result<String, LlmError> {
            if api_key == "sk-bad" {
                return Err(LlmError::InvalidApiKey);
            }
            assert!(!paper.data.is_empty());
            assert!(instructions.contains("peer reviewer"));
            Ok(REVIEW_TEXT.to_string())
        }

        async fn complete(&self, api_key: &str, prompt: &str) -> Result<String, LlmError> {
            if api_key == "sk-bad" {
                return Err(LlmError::InvalidApiKey);
            }
            Ok(format!("echo: {prompt}"))
        }
    }

    fn make_app(server_key: Option<&str>) -> Router {
        let config = Config {
            openai_api_key: server_key.map(str::to_string),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            report_title: DEFAULT_REPORT_TITLE.to_string(),
            port: 3001,
            rust_log: "info".to_string(),
        };
        build_router(AppState {
            config,
            reviewer: Arc::new(StubReviewer),
            measure: FontMeasure::millimetres(FontFamily::Helvetica),
        })
    }

    fn review_request(
        api_key: Option<&str>,
        rubric: Option<&str>,
        file: Option<(&str, &str, &[u8])>,
    ) -> Request<Body> {
        let mut body: Vec<u8> = Vec::new();
        if let Some(rubric) = rubric {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"rubric\"\r\n\r\n{rubric}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, content_type, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/v1/reviews")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(key) = api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn json_request(uri: &str, body: Value, api_key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(key) = api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    const PDF: &[u8] = b"%PDF-1.4\n%fake paper\n";

    // ── Health & rubrics ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send_json(make_app(None), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_rubrics() {
        let request = Request::get("/api/v1/rubrics").body(Body::empty()).unwrap();
        let (status, body) = send_json(make_app(None), request).await;
        assert_eq!(status, StatusCode::OK);
        let rubrics = body["rubrics"].as_array().unwrap();
        assert_eq!(rubrics.len(), 3);
        assert_eq!(rubrics[0]["value"], 0);
        assert_eq!(rubrics[0]["label"], "Your own project from outside of EECS");
    }

    // ── Reviews ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_review_with_caller_key() {
        let request = review_request(
            Some("sk-user"),
            Some("1"),
            Some(("paper.pdf", PDF_MIME, PDF)),
        );
        let (status, body) = send_json(make_app(None), request).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["rubric"], 1);
        assert_eq!(
            body["rubric_label"],
            "Theoretical/empirical study of in-context learning"
        );
        assert_eq!(body["review_text"], REVIEW_TEXT);
        assert_eq!(body["page_count"], 1);
        assert!(body["review_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_review_falls_back_to_server_key() {
        let request = review_request(None, Some("2"), Some(("paper.pdf", PDF_MIME, PDF)));
        let (status, body) = send_json(make_app(Some("sk-server")), request).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["rubric_label"], "Interpretability");
    }

    #[tokio::test]
    async fn test_review_without_any_key_is_401() {
        let request = review_request(None, Some("0"), Some(("paper.pdf", PDF_MIME, PDF)));
        let (status, body) = send_json(make_app(None), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "API_KEY_REQUIRED");
    }

    #[tokio::test]
    async fn test_review_with_rejected_key_is_401() {
        let request = review_request(
            Some("sk-bad"),
            Some("0"),
            Some(("paper.pdf", PDF_MIME, PDF)),
        );
        let (status, body) = send_json(make_app(None), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_API_KEY");
    }

    #[tokio::test]
    async fn test_review_requires_rubric() {
        let request = review_request(Some("sk-user"), None, Some(("paper.pdf", PDF_MIME, PDF)));
        let (status, body) = send_json(make_app(None), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Please select a review type");
    }

    #[tokio::test]
    async fn test_review_requires_file() {
        let request = review_request(Some("sk-user"), Some("0"), None);
        let (status, body) = send_json(make_app(None), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Please upload a file first");
    }

    #[tokio::test]
    async fn test_review_rejects_unsupported_file() {
        let request = review_request(
            Some("sk-user"),
            Some("0"),
            Some(("notes.txt", "text/plain", &b"plain text"[..])),
        );
        let (status, body) = send_json(make_app(None), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Please upload a valid PDF or DOCX file");
    }

    #[tokio::test]
    async fn test_review_rejects_unknown_rubric() {
        let request = review_request(
            Some("sk-user"),
            Some("9"),
            Some(("paper.pdf", PDF_MIME, PDF)),
        );
        let (status, body) = send_json(make_app(None), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    // ── Layout & render ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_layout_returns_document() {
        let request = json_request(
            "/api/v1/layout",
            json!({ "text": "First point.\n\nSecond point.", "title": "Draft Review" }),
            None,
        );
        let (status, body) = send_json(make_app(None), request).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let pages = body["pages"].as_array().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0]["header"]["title"], "Draft Review");
        assert_eq!(pages[0]["lines"].as_array().unwrap().len(), 2);
        assert_eq!(pages[0]["lines"][1]["y"], 62.0);
    }

    #[tokio::test]
    async fn test_layout_rejects_invalid_options() {
        let request = json_request(
            "/api/v1/layout",
            json!({ "text": "Hello", "options": { "margin": 200.0 } }),
            None,
        );
        let (status, body) = send_json(make_app(None), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_render_returns_pdf_attachment() {
        let request = json_request("/api/v1/render", json!({ "text": REVIEW_TEXT }), None);
        let response = make_app(None).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"peer-review.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(lopdf::Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
    }

    // ── Prompt proxy ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_generate_forwards_prompt() {
        let request = json_request("/api/generate", json!({ "prompt": "Hello" }), Some("sk-user"));
        let (status, body) = send_json(make_app(None), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result": "echo: Hello" }));
    }

    #[tokio::test]
    async fn test_generate_rejects_blank_prompt() {
        let request = json_request("/api/generate", json!({ "prompt": "  " }), Some("sk-user"));
        let (status, _) = send_json(make_app(None), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_without_key_is_401() {
        let request = json_request("/api/generate", json!({ "prompt": "Hello" }), None);
        let (status, body) = send_json(make_app(None), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "API_KEY_REQUIRED");
    }
}
