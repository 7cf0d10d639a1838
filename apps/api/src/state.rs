use std::sync::Arc;

use axum::http::HeaderMap;

use crate::config::Config;
use crate::errors::AppError;
use crate::layout::{FontMeasure, LayoutConfig};
use crate::review::reviewer::Reviewer;

/// Header carrying a caller-supplied OpenAI key.
pub const API_KEY_HEADER: &str = "x-openai-api-key";

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable reviewer. Default: the OpenAI-backed `LlmClient`.
    pub reviewer: Arc<dyn Reviewer>,
    /// Body-text measurer for the report layout (Helvetica, millimetres).
    pub measure: FontMeasure,
}

impl AppState {
    /// Report layout for a request made today, titled from config.
    pub fn report_layout(&self, title: Option<&str>) -> LayoutConfig {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(self.config.report_title.as_str());
        LayoutConfig::a4_report(title, chrono::Local::now().date_naive())
    }

    /// The caller's own key wins over the server key.
    pub fn api_key(&self, headers: &HeaderMap) -> Result<String, AppError> {
        headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .or_else(|| self.config.openai_api_key.clone())
            .ok_or(AppError::MissingApiKey)
    }
}
